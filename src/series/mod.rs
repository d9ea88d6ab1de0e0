//! Fixed-interval time series storage
//!
//! A [`TimeSeries`] holds one value slot for every timestamp on the frequency
//! grid between its start and end, inclusive. Missingness is represented by a
//! sentinel value (`NaN` by default; legacy data sets often use `-999`), and
//! any slot may carry a short data flag alongside its value.

use crate::error::{Error, Result};
use crate::temporal::{Frequency, Temporal};
use std::collections::HashMap;

/// One observation produced by a [`TimeSeries`] iterator
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint<'a, T: Temporal> {
    /// Timestamp of the observation
    pub date: T,
    /// Observed value, `None` when the slot is missing
    pub value: Option<f64>,
    /// Data flag attached to the slot, if any
    pub flag: Option<&'a str>,
}

/// A contiguous time series at one fixed frequency
#[derive(Debug, Clone)]
pub struct TimeSeries<T: Temporal> {
    name: Option<String>,
    units: Option<String>,
    description: Option<String>,
    frequency: Frequency,
    start: T,
    end: T,
    values: Vec<f64>,
    flags: HashMap<usize, String>,
    missing_value: f64,
}

impl<T: Temporal> TimeSeries<T> {
    /// Create a series covering `start..=end`, pre-filled with missing slots
    pub fn new(start: T, end: T, frequency: Frequency) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidValue(format!(
                "series start {:?} is after series end {:?}",
                start, end
            )));
        }
        let steps = frequency.steps_between(&start, &end);
        if frequency.advance(&start, steps)? != end {
            return Err(Error::InvalidValue(format!(
                "series end {:?} does not fall on the {} grid anchored at {:?}",
                end, frequency, start
            )));
        }
        let len = usize::try_from(steps)
            .map_err(|_| Error::InvalidValue("series period is negative".into()))?
            + 1;
        Ok(TimeSeries {
            name: None,
            units: None,
            description: None,
            frequency,
            start,
            end,
            values: vec![f64::NAN; len],
            flags: HashMap::new(),
            missing_value: f64::NAN,
        })
    }

    /// Create a series from consecutive values starting at `start`
    pub fn from_values(start: T, frequency: Frequency, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::EmptyData("a series needs at least one value".into()));
        }
        let end = frequency.advance(&start, values.len() as i64 - 1)?;
        let mut series = Self::new(start, end, frequency)?;
        series.values = values;
        Ok(series)
    }

    /// Set the series name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the data units
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the missing-value sentinel
    ///
    /// NaN slots always read as missing, whatever the sentinel.
    pub fn with_missing_value(mut self, missing_value: f64) -> Self {
        self.missing_value = missing_value;
        self
    }

    /// Series name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Data units
    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Sampling frequency
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// First timestamp of the period
    pub fn start(&self) -> T {
        self.start
    }

    /// Last timestamp of the period
    pub fn end(&self) -> T {
        self.end
    }

    /// Number of slots in the period
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no slots
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The missing-value sentinel
    pub fn missing_value(&self) -> f64 {
        self.missing_value
    }

    /// Raw slot values, missing sentinel included
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether `value` reads as missing for this series
    pub fn is_missing_value(&self, value: f64) -> bool {
        value.is_nan() || value == self.missing_value
    }

    /// Slot index of `date`, `None` when outside the period or off the grid
    pub fn index_of(&self, date: &T) -> Option<usize> {
        if *date < self.start || *date > self.end {
            return None;
        }
        let steps = self.frequency.steps_between(&self.start, date);
        let idx = usize::try_from(steps).ok()?;
        match self.frequency.advance(&self.start, steps) {
            Ok(on_grid) if on_grid == *date => Some(idx),
            _ => None,
        }
    }

    /// Timestamp of slot `index`
    pub fn date_at(&self, index: usize) -> Option<T> {
        if index >= self.values.len() {
            return None;
        }
        self.frequency.advance(&self.start, index as i64).ok()
    }

    /// Value at `date`, `None` when missing or outside the period
    pub fn get(&self, date: &T) -> Option<f64> {
        let idx = self.index_of(date)?;
        let v = self.values[idx];
        if self.is_missing_value(v) {
            None
        } else {
            Some(v)
        }
    }

    /// Data flag at `date`, if one was recorded
    pub fn flag(&self, date: &T) -> Option<&str> {
        let idx = self.index_of(date)?;
        self.flags.get(&idx).map(|s| s.as_str())
    }

    /// Store `value` at `date`
    pub fn set(&mut self, date: &T, value: f64) -> Result<()> {
        let idx = self.index_of(date).ok_or_else(|| {
            Error::OutOfRange(format!("date {:?} is outside the series period", date))
        })?;
        self.values[idx] = value;
        Ok(())
    }

    /// Store `value` at `date` together with a data flag
    pub fn set_with_flag(&mut self, date: &T, value: f64, flag: impl Into<String>) -> Result<()> {
        let idx = self.index_of(date).ok_or_else(|| {
            Error::OutOfRange(format!("date {:?} is outside the series period", date))
        })?;
        self.values[idx] = value;
        self.flags.insert(idx, flag.into());
        Ok(())
    }

    /// Mark the slot at `date` as missing
    pub fn set_missing(&mut self, date: &T) -> Result<()> {
        let missing = self.missing_value;
        self.set(date, missing)
    }

    /// Count of non-missing slots
    pub fn count_non_missing(&self) -> usize {
        self.values
            .iter()
            .filter(|&&v| !self.is_missing_value(v))
            .count()
    }

    /// Chronological iterator over the whole period
    pub fn iter(&self) -> TimeSeriesIter<'_, T> {
        TimeSeriesIter {
            series: self,
            index: 0,
            end_index: self.values.len(),
        }
    }

    /// Chronological iterator over the part of `from..=to` inside the period
    pub fn iter_range(&self, from: &T, to: &T) -> TimeSeriesIter<'_, T> {
        let lo = if *from <= self.start {
            0
        } else {
            // First on-grid slot at or after `from`
            let steps = self.frequency.steps_between(&self.start, from);
            let steps = usize::try_from(steps).unwrap_or(0);
            match self.frequency.advance(&self.start, steps as i64) {
                Ok(d) if d >= *from => steps,
                _ => steps + 1,
            }
        };
        let hi = if *to >= self.end {
            self.values.len()
        } else if *to < self.start {
            0
        } else {
            let steps = self.frequency.steps_between(&self.start, to);
            usize::try_from(steps).map(|s| s + 1).unwrap_or(0)
        };
        TimeSeriesIter {
            series: self,
            index: lo.min(self.values.len()),
            end_index: hi.max(lo.min(self.values.len())),
        }
    }
}

/// Iterator over `(date, value, flag)` observations
pub struct TimeSeriesIter<'a, T: Temporal> {
    series: &'a TimeSeries<T>,
    index: usize,
    end_index: usize,
}

impl<'a, T: Temporal> Iterator for TimeSeriesIter<'a, T> {
    type Item = TimePoint<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.end_index {
            return None;
        }
        let idx = self.index;
        self.index += 1;
        let date = self.series.date_at(idx)?;
        let raw = self.series.values[idx];
        Some(TimePoint {
            date,
            value: if self.series.is_missing_value(raw) {
                None
            } else {
                Some(raw)
            },
            flag: self.series.flags.get(&idx).map(|s| s.as_str()),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.end_index.saturating_sub(self.index);
        (rem, Some(rem))
    }
}
