use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Days from `start` up to, not including, `end`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d < end)
}

/// Datetimes from `start` towards `end` (exclusive) in increments of `step`.
///
/// A negative step walks backwards. A step pointing away from `end` yields
/// nothing. A zero step is an error.
pub fn datetime_range(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: TimeDelta,
) -> Result<impl Iterator<Item = NaiveDateTime>> {
    if step.is_zero() {
        return Err(Error::invalid("step cannot be zero"));
    }
    let forward = step > TimeDelta::zero();
    Ok(
        std::iter::successors(Some(start), move |cur| cur.checked_add_signed(step))
            .take_while(move |cur| if forward { *cur < end } else { *cur > end }),
    )
}
