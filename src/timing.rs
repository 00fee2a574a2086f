//! Timing and retry wrappers

use crate::error::{Error, Result};
use serde_json::json;
use std::fmt::Display;
use std::time::{Duration, Instant};

/// Options for [`timed`].
#[derive(Clone, Copy)]
pub struct TimedOptions<'a> {
    /// Decimal places for the elapsed seconds; `None` keeps full precision.
    pub round: Option<u32>,
    /// Receives the report. Defaults to an info event.
    pub sink: Option<&'a dyn Fn(&str)>,
    /// Arguments to include in the report.
    pub args: &'a [&'a str],
    /// Emit a JSON object instead of text.
    pub serialize: bool,
    pub sep: &'a str,
}

impl Default for TimedOptions<'_> {
    fn default() -> Self {
        Self {
            round: Some(2),
            sink: None,
            args: &[],
            serialize: false,
            sep: " | ",
        }
    }
}

/// Run `f` and report how long it took as `'<name>' took <secs>s`.
pub fn timed<T>(name: &str, opts: &TimedOptions<'_>, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    let mut elapsed = start.elapsed().as_secs_f64();
    if let Some(r) = opts.round {
        let scale = 10f64.powi(r as i32);
        elapsed = (elapsed * scale).round() / scale;
    }

    let message = if opts.serialize {
        json!({ "name": name, "time": elapsed, "args": opts.args }).to_string()
    } else if opts.args.is_empty() {
        format!("'{}' took {}s", name, elapsed)
    } else {
        format!("'{}' took {}s{}Args: {}", name, elapsed, opts.sep, opts.args.join(", "))
    };

    match opts.sink {
        Some(sink) => sink(&message),
        None => tracing::info!("{}", message),
    }
    result
}

/// Call `f` until it succeeds, at most `attempts` times, sleeping `delay`
/// between failures. The last error is returned.
///
/// ```
/// use std::time::Duration;
///
/// let mut calls = 0;
/// let value: Result<u32, anyhow::Error> = stdl::timing::retry(3, Duration::ZERO, || {
///     calls += 1;
///     if calls < 2 { anyhow::bail!("not yet") } else { Ok(7) }
/// });
/// assert_eq!(value.unwrap(), 7);
/// assert_eq!(calls, 2);
/// ```
pub fn retry<T, E>(attempts: u32, delay: Duration, mut f: impl FnMut() -> Result<T, E>) -> Result<T, E>
where
    E: From<Error> + Display,
{
    if attempts < 1 {
        return Err(Error::invalid("attempts must be greater than 0").into());
    }
    let mut attempt = 1;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                tracing::warn!(attempt, attempts, error = %e, "attempt failed, retrying");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
