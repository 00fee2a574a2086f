//! `HH:MM:SS[.mmm]` conversion

use crate::error::{Error, Result};

/// Seconds to `HH:MM:SS`, with `.mmm` when `ms` is set. Hours are not
/// wrapped, so a day and a bit is `25:05:21`.
pub fn seconds_to_hms(secs: f64, ms: bool) -> String {
    let sign = if secs < 0.0 { "-" } else { "" };
    let secs = secs.abs();

    // Whole milliseconds, so rounding can carry into the seconds field.
    // Float to integer casts saturate, and u128 leaves room for the scaling.
    let total_ms: u128 = if ms {
        (secs * 1000.0).round() as u128
    } else {
        (secs.trunc() as u128).saturating_mul(1000)
    };
    let h = total_ms / 3_600_000;
    let m = total_ms / 60_000 % 60;
    let s = total_ms / 1000 % 60;
    let mut out = format!("{sign}{h:02}:{m:02}:{s:02}");

    if ms {
        out.push_str(&format!(".{:03}", total_ms % 1000));
    }
    out
}

/// Parse `HH:MM:SS`, `M:S` or plain seconds. A leading `-` negates.
///
/// With `ms`, a fractional part on the seconds field is read as
/// milliseconds (`"2:03.4"` is 123.4).
pub fn hms_to_seconds(time: &str, ms: bool) -> Result<f64> {
    let time = time.trim();
    let (negative, body) = match time.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, time),
    };

    let mut parts: Vec<&str> = body.split(':').collect();
    if parts.len() == 1 {
        let value: f64 = parts[0]
            .parse()
            .map_err(|_| Error::invalid(format!("invalid time: '{}'", time)))?;
        return Ok(if negative { -value } else { value });
    }

    let mut fraction = 0.0;
    if ms {
        if let Some((secs, millis)) = parts[parts.len() - 1].split_once('.') {
            if millis.is_empty() || !millis.chars().all(|c| c.is_ascii_digit()) {
                return Err(Error::invalid(format!("invalid milliseconds in time: '{}'", time)));
            }
            let padded = format!("{:0<3}", millis);
            let millis: u64 = padded
                .parse()
                .map_err(|_| Error::invalid(format!("invalid milliseconds in time: '{}'", time)))?;
            fraction = millis as f64 / 1000.0;
            let last = parts.len() - 1;
            parts[last] = secs;
        }
    }

    let fields = parts
        .iter()
        .map(|p| {
            p.trim()
                .parse::<i64>()
                .map_err(|_| Error::invalid(format!("invalid time segment '{}' in '{}'", p, time)))
        })
        .collect::<Result<Vec<_>>>()?;

    let (h, m, s) = match fields.as_slice() {
        [m, s] => {
            if *s >= 60 {
                return Err(Error::invalid(format!("seconds ({}) must be < 60", s)));
            }
            (0, *m, *s)
        }
        [h, m, s] => {
            if *m >= 60 || *s >= 60 {
                return Err(Error::invalid(format!(
                    "minutes ({}) or seconds ({}) must be < 60",
                    m, s
                )));
            }
            (*h, *m, *s)
        }
        _ => return Err(Error::invalid("invalid number of time segments")),
    };
    if h < 0 || m < 0 || s < 0 {
        return Err(Error::invalid(format!("negative time segment in '{}'", time)));
    }
    let total = h
        .checked_mul(3600)
        .and_then(|t| m.checked_mul(60).and_then(|mm| t.checked_add(mm)))
        .and_then(|t| t.checked_add(s))
        .ok_or_else(|| Error::invalid(format!("time out of range: '{}'", time)))?;

    let result = total as f64 + fraction;
    Ok(if negative { -result } else { result })
}
