use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling frequency (interval) of a time series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// Every second
    Secondly,
    /// Every minute
    Minutely,
    /// Every hour
    Hourly,
    /// Every day
    Daily,
    /// Every week
    Weekly,
    /// Every calendar month
    Monthly,
    /// Every quarter (3 calendar months)
    Quarterly,
    /// Every calendar year
    Yearly,
}

impl Frequency {
    /// Parse a frequency from a pandas-style code or a long name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "S" | "SEC" | "SECOND" | "SECONDS" => Some(Frequency::Secondly),
            "T" | "MIN" | "MINUTE" | "MINUTES" => Some(Frequency::Minutely),
            "H" | "HOUR" | "HOURS" | "HOURLY" => Some(Frequency::Hourly),
            "D" | "DAY" | "DAYS" | "DAILY" => Some(Frequency::Daily),
            "W" | "WEEK" | "WEEKS" | "WEEKLY" => Some(Frequency::Weekly),
            "M" | "MONTH" | "MONTHS" | "MONTHLY" => Some(Frequency::Monthly),
            "Q" | "QUARTER" | "QUARTERS" | "QUARTERLY" => Some(Frequency::Quarterly),
            "Y" | "YEAR" | "YEARS" | "A" | "ANNUAL" | "ANNUALLY" | "YEARLY" => {
                Some(Frequency::Yearly)
            }
            _ => None,
        }
    }

    /// Whether stepping is by calendar month rather than by a fixed duration
    pub fn is_month_based(&self) -> bool {
        matches!(
            self,
            Frequency::Monthly | Frequency::Quarterly | Frequency::Yearly
        )
    }

    /// Number of calendar months per step for month-based frequencies
    pub(crate) fn months_per_step(&self) -> Option<i64> {
        match self {
            Frequency::Monthly => Some(1),
            Frequency::Quarterly => Some(3),
            Frequency::Yearly => Some(12),
            _ => None,
        }
    }

    /// Step width for duration-based frequencies
    pub(crate) fn step_duration(&self) -> Option<Duration> {
        match self {
            Frequency::Secondly => Some(Duration::seconds(1)),
            Frequency::Minutely => Some(Duration::minutes(1)),
            Frequency::Hourly => Some(Duration::hours(1)),
            Frequency::Daily => Some(Duration::days(1)),
            Frequency::Weekly => Some(Duration::weeks(1)),
            _ => None,
        }
    }

    /// Approximate seconds per step
    /// Months and years are nominal values
    pub fn to_seconds(&self) -> i64 {
        match self {
            Frequency::Secondly => 1,
            Frequency::Minutely => 60,
            Frequency::Hourly => 3600,
            Frequency::Daily => 86400,
            Frequency::Weekly => 604800,
            Frequency::Monthly => 2592000,   // nominal 30 days
            Frequency::Quarterly => 7776000, // nominal 90 days
            Frequency::Yearly => 31536000,   // nominal 365 days
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Secondly => write!(f, "S"),
            Frequency::Minutely => write!(f, "T"),
            Frequency::Hourly => write!(f, "H"),
            Frequency::Daily => write!(f, "D"),
            Frequency::Weekly => write!(f, "W"),
            Frequency::Monthly => write!(f, "M"),
            Frequency::Quarterly => write!(f, "Q"),
            Frequency::Yearly => write!(f, "Y"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parsing() {
        assert_eq!(Frequency::from_str("D"), Some(Frequency::Daily));
        assert_eq!(Frequency::from_str("day"), Some(Frequency::Daily));
        assert_eq!(Frequency::from_str("DAILY"), Some(Frequency::Daily));
        assert_eq!(Frequency::from_str("M"), Some(Frequency::Monthly));
        assert_eq!(Frequency::from_str("Q"), Some(Frequency::Quarterly));
        assert_eq!(Frequency::from_str("Y"), Some(Frequency::Yearly));
        assert_eq!(Frequency::from_str("invalid"), None);
    }

    #[test]
    fn test_display_round_trip() {
        for freq in [
            Frequency::Secondly,
            Frequency::Minutely,
            Frequency::Hourly,
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Quarterly,
            Frequency::Yearly,
        ] {
            assert_eq!(Frequency::from_str(&freq.to_string()), Some(freq));
        }
    }
}
