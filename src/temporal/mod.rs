//! Calendar-aware timestamp handling
//!
//! Timestamps are plain chrono values behind the [`Temporal`] trait; all
//! interval-specific behavior (stepping, step counting) lives on the
//! [`Frequency`] strategy value, so a series over days and a series over
//! calendar months share one storage type.

mod frequency;

pub use self::frequency::Frequency;

use crate::error::{Error, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Debug;

/// A point on the time axis usable as a series timestamp
pub trait Temporal:
    Copy + Clone + Debug + PartialOrd + Datelike + Send + Sync + 'static
{
    /// Shift by a signed duration, `None` on overflow
    fn add_signed(&self, delta: Duration) -> Option<Self>;

    /// Shift by a signed number of calendar months, `None` on overflow
    ///
    /// Day-of-month is clamped to the target month's last day.
    fn add_months(&self, months: i64) -> Option<Self>;

    /// Signed duration from `other` to `self`
    fn signed_duration_since(&self, other: &Self) -> Duration;

    /// Parse from a string
    fn parse(s: &str) -> Result<Self>;

    /// Format as an ISO-style string
    fn format_iso(&self) -> String;
}

impl Temporal for NaiveDate {
    fn add_signed(&self, delta: Duration) -> Option<Self> {
        self.checked_add_signed(delta)
    }

    fn add_months(&self, months: i64) -> Option<Self> {
        let n = u32::try_from(months.unsigned_abs()).ok()?;
        if months >= 0 {
            self.checked_add_months(Months::new(n))
        } else {
            self.checked_sub_months(Months::new(n))
        }
    }

    fn signed_duration_since(&self, other: &Self) -> Duration {
        *self - *other
    }

    fn parse(s: &str) -> Result<Self> {
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(d);
        }
        // Monthly records are often written as "YYYY-MM"
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
            return Ok(d);
        }
        Err(Error::Format(format!("cannot parse date: {}", s)))
    }

    fn format_iso(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl Temporal for NaiveDateTime {
    fn add_signed(&self, delta: Duration) -> Option<Self> {
        self.checked_add_signed(delta)
    }

    fn add_months(&self, months: i64) -> Option<Self> {
        let n = u32::try_from(months.unsigned_abs()).ok()?;
        if months >= 0 {
            self.checked_add_months(Months::new(n))
        } else {
            self.checked_sub_months(Months::new(n))
        }
    }

    fn signed_duration_since(&self, other: &Self) -> Duration {
        *self - *other
    }

    fn parse(s: &str) -> Result<Self> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(d.and_time(NaiveTime::MIN));
        }
        Err(Error::Format(format!("cannot parse datetime: {}", s)))
    }

    fn format_iso(&self) -> String {
        self.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl Frequency {
    /// Advance a timestamp by a signed number of steps
    pub fn advance<T: Temporal>(&self, t: &T, steps: i64) -> Result<T> {
        if steps == 0 {
            return Ok(*t);
        }
        let next = if let Some(k) = self.months_per_step() {
            t.add_months(k * steps)
        } else {
            let n = i32::try_from(steps).ok();
            let step = self.step_duration().unwrap_or_else(Duration::zero);
            n.and_then(|n| step.checked_mul(n))
                .and_then(|delta| t.add_signed(delta))
        };
        match next {
            Some(n) if n != *t => Ok(n),
            Some(_) => Err(Error::InvalidOperation(format!(
                "frequency {} does not advance timestamps of this resolution",
                self
            ))),
            None => Err(Error::OutOfRange(format!(
                "timestamp overflow advancing {} step(s) at frequency {}",
                steps, self
            ))),
        }
    }

    /// Number of whole steps from `start` to `end` (negative when `end < start`)
    pub fn steps_between<T: Temporal>(&self, start: &T, end: &T) -> i64 {
        if let Some(k) = self.months_per_step() {
            let months = (end.year() as i64 - start.year() as i64) * 12
                + (end.month() as i64 - start.month() as i64);
            months.div_euclid(k)
        } else {
            let step = self.step_duration().unwrap_or_else(Duration::zero);
            let secs = step.num_seconds().max(1);
            end.signed_duration_since(start).num_seconds().div_euclid(secs)
        }
    }
}

/// Build the chronological sequence of timestamps from `start` to `end`
///
/// With `inclusive` set, `end` itself is part of the range when it falls on
/// the frequency grid.
pub fn date_range<T: Temporal>(
    start: T,
    end: T,
    freq: Frequency,
    inclusive: bool,
) -> Result<Vec<T>> {
    if start > end {
        return Err(Error::InvalidValue(format!(
            "range start {:?} is after range end {:?}",
            start, end
        )));
    }
    let mut out = Vec::new();
    let mut cur = start;
    loop {
        if cur > end || (!inclusive && cur == end) {
            break;
        }
        out.push(cur);
        cur = freq.advance(&cur, 1)?;
    }
    Ok(out)
}
