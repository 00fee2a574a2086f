//! Date and time helpers
//!
//! Timestamps given as numbers are interpreted as UTC.

mod fmt;
mod hms;
mod range;
mod timer;

pub use fmt::{AsDateTime, date_fmt, datetime_fmt, now, parse_datetime, time_fmt};
pub use hms::{hms_to_seconds, seconds_to_hms};
pub use range::{date_range, datetime_range};
pub use timer::{Timer, TimerStop, sleep};
