//! # tsregrs
//!
//! Calendar-aware time series regression engine.
//!
//! Given an independent and a dependent time series on the same frequency
//! grid, the engine extracts paired samples (honoring per-month enablement
//! masks and missing data), fits an OLS or MOVE2 relationship for the pooled
//! period and for each of the 12 calendar months, quantifies the fit errors
//! over the fitting sample, and validates every fitted relationship against
//! caller-supplied thresholds.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tsregrs::regression::{RegressionOptions, TimeSeriesRegression};
//! use tsregrs::series::TimeSeries;
//! use tsregrs::temporal::Frequency;
//!
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let x = TimeSeries::from_values(start, Frequency::Monthly,
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! let y = TimeSeries::from_values(start, Frequency::Monthly,
//!     vec![2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
//!
//! let mut analysis =
//!     TimeSeriesRegression::new(&x, &y, RegressionOptions::default()).unwrap();
//! analysis.analyze().unwrap();
//!
//! let fit = &analysis.results().unwrap().single;
//! assert!(fit.ok);
//! assert!((fit.slope - 2.0).abs() < 1e-9);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod regression;
pub mod series;
pub mod stats;
pub mod temporal;

// Re-export commonly used types
pub use error::{Error, Result};
pub use regression::{
    AnalysisMethod, MonthMask, RegressionOptions, TimeSeriesRegression, Transformation,
};
pub use series::{TimePoint, TimeSeries};
pub use temporal::{date_range, Frequency, Temporal};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
