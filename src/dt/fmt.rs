//! Date and time formatting and parsing

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Something that can be turned into a naive (UTC for timestamps) datetime.
pub trait AsDateTime {
    fn as_datetime(&self) -> Result<NaiveDateTime>;
}

impl AsDateTime for NaiveDateTime {
    fn as_datetime(&self) -> Result<NaiveDateTime> {
        Ok(*self)
    }
}

impl<Tz: TimeZone> AsDateTime for DateTime<Tz> {
    fn as_datetime(&self) -> Result<NaiveDateTime> {
        Ok(self.naive_local())
    }
}

impl AsDateTime for f64 {
    fn as_datetime(&self) -> Result<NaiveDateTime> {
        let secs = self.floor();
        let nanos = ((self - secs) * 1e9).round() as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
            .map(|d| d.naive_utc())
            .ok_or_else(|| Error::invalid(format!("timestamp out of range: {}", self)))
    }
}

impl AsDateTime for i64 {
    fn as_datetime(&self) -> Result<NaiveDateTime> {
        DateTime::from_timestamp(*self, 0)
            .map(|d| d.naive_utc())
            .ok_or_else(|| Error::invalid(format!("timestamp out of range: {}", self)))
    }
}

impl AsDateTime for i32 {
    fn as_datetime(&self) -> Result<NaiveDateTime> {
        i64::from(*self).as_datetime()
    }
}

impl AsDateTime for str {
    fn as_datetime(&self) -> Result<NaiveDateTime> {
        parse_datetime(self)
    }
}

impl<T: AsDateTime + ?Sized> AsDateTime for &T {
    fn as_datetime(&self) -> Result<NaiveDateTime> {
        (**self).as_datetime()
    }
}

/// Current UTC time.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Format date and time, e.g. `datetime_fmt(0, "dmY", "/", ".", false)`
/// gives `"01/01/1970 00.00.00"`.
///
/// `fmt` orders the date fields: any arrangement of `Y`, `m`, `d`.
pub fn datetime_fmt(when: impl AsDateTime, fmt: &str, dsep: &str, tsep: &str, ms: bool) -> Result<String> {
    let when = when.as_datetime()?;
    let mut pattern = date_pattern(fmt, dsep)?;
    pattern.push(' ');
    pattern.push_str(&time_pattern(tsep, ms));
    Ok(when.format(&pattern).to_string())
}

/// Format the time of day, `HH:MM:SS[.mmm]`.
pub fn time_fmt(when: impl AsDateTime, sep: &str, ms: bool) -> Result<String> {
    let when = when.as_datetime()?;
    Ok(when.format(&time_pattern(sep, ms)).to_string())
}

/// Format a date, e.g. `date_fmt(date, "Ymd", "-")` gives `"1970-01-01"`.
pub fn date_fmt(date: NaiveDate, fmt: &str, sep: &str) -> Result<String> {
    Ok(date.format(&date_pattern(fmt, sep)?).to_string())
}

fn date_pattern(fmt: &str, sep: &str) -> Result<String> {
    let fields: Vec<char> = fmt.chars().collect();
    let valid = fields.len() == 3
        && ['Y', 'm', 'd'].iter().all(|f| fields.contains(f));
    if !valid {
        return Err(Error::invalid(format!(
            "invalid date format '{}': expected an arrangement of 'Y', 'm' and 'd'",
            fmt
        )));
    }
    let sep = escape(sep);
    Ok(fields
        .iter()
        .map(|f| format!("%{}", f))
        .collect::<Vec<_>>()
        .join(&sep))
}

fn time_pattern(sep: &str, ms: bool) -> String {
    let sep = escape(sep);
    let mut pattern = format!("%H{sep}%M{sep}%S");
    if ms {
        pattern.push_str("%.3f");
    }
    pattern
}

// Literal `%` in a separator must not start a chrono specifier.
fn escape(sep: &str) -> String {
    sep.replace('%', "%%")
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Parse RFC 3339, a handful of common layouts, or a unix timestamp.
///
/// Offsets are converted to UTC. Date-only input is midnight.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d.and_time(chrono::NaiveTime::MIN));
        }
    }
    if let Ok(ts) = s.parse::<f64>() {
        return ts.as_datetime();
    }
    Err(Error::invalid(format!("cannot parse datetime: '{}'", s)))
}
