//! Stopwatch with labelled stops, and a jittered sleep

use super::fmt::datetime_fmt;
use super::hms::seconds_to_hms;
use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use rand::Rng;
use std::fmt;
use std::time::{Duration, Instant};

/// One recorded stop of a [`Timer`].
#[derive(Debug, Clone)]
pub struct TimerStop {
    pub total: Duration,
    pub since_last: Duration,
    /// Wall clock time of the stop.
    pub at: DateTime<Local>,
    pub label: Option<String>,
    instant: Instant,
}

impl TimerStop {
    pub fn total_seconds(&self) -> f64 {
        self.total.as_secs_f64()
    }
}

impl fmt::Display for TimerStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = datetime_fmt(self.at, "Ymd", "-", ":", false).map_err(|_| fmt::Error)?;
        if let Some(label) = &self.label {
            write!(f, "{} | ", label)?;
        }
        write!(
            f,
            "total={}, since_last={}, at={}",
            seconds_to_hms(self.total.as_secs_f64(), true),
            seconds_to_hms(self.since_last.as_secs_f64(), true),
            at
        )
    }
}

/// Keeps every stop since creation or the last [`Timer::reset`].
///
/// ```
/// let mut timer = stdl::dt::Timer::new(true);
/// let stop = timer.stop(Some("parsed"));
/// assert_eq!(stop.label.as_deref(), Some("parsed"));
/// assert_eq!(timer.stops().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Timer {
    ms: bool,
    start: Instant,
    stops: Vec<TimerStop>,
}

impl Timer {
    /// With `ms == false` durations are rounded to whole seconds.
    pub fn new(ms: bool) -> Self {
        let mut timer = Self {
            ms,
            start: Instant::now(),
            stops: Vec::new(),
        };
        timer.reset();
        timer
    }

    pub fn stop(&mut self, label: Option<&str>) -> TimerStop {
        let now = Instant::now();
        let mut total = now - self.start;
        let mut since_last = self
            .stops
            .last()
            .map_or(Duration::ZERO, |last| now - last.instant);
        if !self.ms {
            total = Duration::from_secs_f64(total.as_secs_f64().round());
            since_last = Duration::from_secs_f64(since_last.as_secs_f64().round());
        }

        let stop = TimerStop {
            total,
            since_last,
            at: Local::now(),
            label: label.map(str::to_string),
            instant: now,
        };
        self.stops.push(stop.clone());
        stop
    }

    /// Total elapsed time. Records a stop.
    pub fn taken(&mut self) -> Duration {
        self.stop(None).total
    }

    pub fn taken_seconds(&mut self) -> f64 {
        self.stop(None).total_seconds()
    }

    pub fn reset(&mut self) {
        self.start = Instant::now();
        self.stops = vec![TimerStop {
            total: Duration::ZERO,
            since_last: Duration::ZERO,
            at: Local::now(),
            label: Some("start".to_string()),
            instant: self.start,
        }];
    }

    pub fn stops(&self) -> &[TimerStop] {
        &self.stops
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Sleep for `lo` seconds, or a random duration in `[lo, hi]` when `hi` is
/// given. Returns the slept time.
pub fn sleep(lo: f64, hi: Option<f64>) -> Result<f64> {
    if !lo.is_finite() || lo < 0.0 {
        return Err(Error::invalid(format!("invalid sleep time: {}", lo)));
    }
    let secs = match hi {
        None => lo,
        Some(hi) if !hi.is_finite() || lo > hi => {
            return Err(Error::invalid(format!(
                "minimum sleep time is higher than maximum: ({}, {})",
                lo, hi
            )));
        }
        Some(hi) => rand::thread_rng().gen_range(lo..=hi),
    };
    std::thread::sleep(Duration::from_secs_f64(secs));
    Ok(secs)
}
