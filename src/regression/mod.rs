//! Time series regression engine
//!
//! Fits a linear relationship between an independent and a dependent time
//! series, both for the pooled period ("single equation") and separately for
//! each of the 12 calendar months, with missing-data-aware sample
//! extraction, optional log10 transformation, error estimation over the
//! fitting sample, and threshold checks on each fitted relationship.
//!
//! The pipeline runs in four stages, each a pure function of the previous
//! stage's immutable output:
//!
//! 1. data extraction -> [`RegressionDataSet`]
//! 2. fitting (OLS or MOVE2) -> [`RegressionResultsSet`]
//! 3. error estimation -> [`EstimateErrorsSet`] (original and transformed units)
//! 4. relationship checks -> [`RegressionChecksSet`]
//!
//! [`TimeSeriesRegression`] drives the stages and caches their outputs.

mod analysis;
mod checks;
mod data;
mod estimate;
mod fit;

pub use analysis::TimeSeriesRegression;

use crate::error::{Error, Result};
use crate::temporal::Temporal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regression method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisMethod {
    /// Ordinary least squares
    OlsRegression,
    /// Maintenance of Variance Extension, type 2
    Move2,
}

impl AnalysisMethod {
    /// Parse a method name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OLS" | "OLSREGRESSION" => Some(AnalysisMethod::OlsRegression),
            "MOVE2" => Some(AnalysisMethod::Move2),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMethod::OlsRegression => write!(f, "OLSRegression"),
            AnalysisMethod::Move2 => write!(f, "MOVE2"),
        }
    }
}

/// Transformation applied to both samples before fitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transformation {
    /// Fit in original data units
    None,
    /// Fit on log10-transformed values; non-positive values are replaced by
    /// a substitute value before the transform
    Log10,
}

impl Transformation {
    /// Parse a transformation name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Some(Transformation::None),
            "LOG" | "LOG10" => Some(Transformation::Log10),
            _ => None,
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformation::None => write!(f, "None"),
            Transformation::Log10 => write!(f, "Log10"),
        }
    }
}

/// Default substitute for non-positive values under a log10 transform
pub const DEFAULT_LOG_SUBSTITUTE: f64 = 0.001;

/// Enablement mask over the 12 calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthMask([bool; 12]);

impl MonthMask {
    /// Mask with every month enabled
    pub fn all() -> Self {
        MonthMask([true; 12])
    }

    /// Mask enabling exactly the given months (1 = January .. 12 = December)
    pub fn from_months(months: &[u32]) -> Result<Self> {
        let mut mask = [false; 12];
        for &m in months {
            if !(1..=12).contains(&m) {
                return Err(Error::InvalidValue(format!(
                    "month number out of range 1-12: {}",
                    m
                )));
            }
            mask[(m - 1) as usize] = true;
        }
        Ok(MonthMask(mask))
    }

    /// Whether `month` (1-12) is enabled; out-of-range months read disabled
    pub fn is_enabled(&self, month: u32) -> bool {
        (1..=12).contains(&month) && self.0[(month - 1) as usize]
    }

    /// The enabled month numbers in calendar order
    pub fn enabled_months(&self) -> Vec<u32> {
        (1..=12).filter(|&m| self.is_enabled(m)).collect()
    }
}

impl Default for MonthMask {
    fn default() -> Self {
        MonthMask::all()
    }
}

/// Configuration of a regression analysis
///
/// Construct with [`Default::default`] and override the fields of interest;
/// [`TimeSeriesRegression::new`] validates the combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionOptions<T: Temporal> {
    /// Regression method
    pub method: AnalysisMethod,
    /// Value transformation applied before fitting
    pub transformation: Transformation,
    /// Substitute for non-positive values under [`Transformation::Log10`]
    pub log_substitute: f64,
    /// Calendar months contributing to the analysis
    pub month_mask: MonthMask,
    /// Forced intercept; only `0.0` is accepted, OLS-only, and incompatible
    /// with a log10 transform
    pub intercept: Option<f64>,
    /// Analysis range over the dependent series; its full period when unset
    pub dependent_range: Option<(T, T)>,
    /// Analysis range over the independent series; its full period when unset
    pub independent_range: Option<(T, T)>,
    /// Minimum paired sample size for the checks; 2 when unset
    pub minimum_sample_size: Option<usize>,
    /// Minimum |R| for the checks; no correlation check when unset
    pub minimum_correlation: Option<f64>,
    /// Confidence level in percent (e.g. 95.0) for the slope t-test;
    /// no confidence check when unset
    pub confidence_interval: Option<f64>,
}

impl<T: Temporal> Default for RegressionOptions<T> {
    fn default() -> Self {
        RegressionOptions {
            method: AnalysisMethod::OlsRegression,
            transformation: Transformation::None,
            log_substitute: DEFAULT_LOG_SUBSTITUTE,
            month_mask: MonthMask::all(),
            intercept: None,
            dependent_range: None,
            independent_range: None,
            minimum_sample_size: None,
            minimum_correlation: None,
            confidence_interval: None,
        }
    }
}

impl<T: Temporal> RegressionOptions<T> {
    /// Options for `method` with every other field at its default
    pub fn new(method: AnalysisMethod) -> Self {
        RegressionOptions {
            method,
            ..Default::default()
        }
    }
}

/// One equation's extracted sample
///
/// `x`/`y` are the paired fitting arrays (equal length, index-for-index the
/// same instant); `x_extended`/`y_extended` are the one-sided samples over
/// each series' own analysis range, used by MOVE2.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionData {
    x: Vec<f64>,
    y: Vec<f64>,
    x_extended: Vec<f64>,
    y_extended: Vec<f64>,
}

impl RegressionData {
    pub(crate) fn from_parts(
        x: Vec<f64>,
        y: Vec<f64>,
        x_extended: Vec<f64>,
        y_extended: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(x.len(), y.len());
        RegressionData {
            x,
            y,
            x_extended,
            y_extended,
        }
    }

    /// Paired independent values
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Paired dependent values
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Independent values over the independent analysis range, dependent
    /// series ignored
    pub fn x_extended(&self) -> &[f64] {
        &self.x_extended
    }

    /// Dependent values over the dependent analysis range, independent
    /// series ignored
    pub fn y_extended(&self) -> &[f64] {
        &self.y_extended
    }

    /// Number of paired observations
    pub fn sample_size(&self) -> usize {
        self.x.len()
    }

    /// Whether the paired sample is empty
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Extracted samples: the pooled single equation plus one bucket per month
///
/// Monthly buckets are indexed by calendar month; a disabled month holds an
/// empty bucket, never a missing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionDataSet {
    single: RegressionData,
    monthly: [RegressionData; 12],
}

impl RegressionDataSet {
    pub(crate) fn from_parts(single: RegressionData, monthly: [RegressionData; 12]) -> Self {
        RegressionDataSet { single, monthly }
    }

    /// The pooled single-equation sample
    pub fn single(&self) -> &RegressionData {
        &self.single
    }

    /// The sample for `month` (1-12)
    pub fn monthly(&self, month: u32) -> Option<&RegressionData> {
        if (1..=12).contains(&month) {
            Some(&self.monthly[(month - 1) as usize])
        } else {
            None
        }
    }

    pub(crate) fn monthly_all(&self) -> &[RegressionData; 12] {
        &self.monthly
    }
}

/// One fitted equation
///
/// When `ok` is false the sample was degenerate (too small, zero variance,
/// or a numerical failure) and the statistics are NaN; callers must check
/// `ok` before trusting them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResults {
    /// Whether the fit was performed successfully
    pub ok: bool,
    /// Fitted intercept (a)
    pub intercept: f64,
    /// Fitted slope (b)
    pub slope: f64,
    /// Pearson correlation coefficient of the paired sample
    pub correlation: f64,
}

/// Fit results for the single equation and each month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResultsSet {
    /// The pooled single-equation fit
    pub single: RegressionResults,
    /// Monthly fits, January first
    pub monthly: [RegressionResults; 12],
}

impl RegressionResultsSet {
    /// The fit for `month` (1-12)
    pub fn monthly(&self, month: u32) -> Option<&RegressionResults> {
        if (1..=12).contains(&month) {
            Some(&self.monthly[(month - 1) as usize])
        } else {
            None
        }
    }
}

/// Error statistics from re-estimating one equation's fitting sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateErrors {
    /// Estimated dependent values over the fitting sample
    pub estimates: Vec<f64>,
    /// Root mean squared error; `None` when the sample is empty
    pub rmse: Option<f64>,
    /// Standard error of estimate; `None` unless the sample has more than
    /// two observations
    pub std_err_estimate: Option<f64>,
    /// Standard error of the slope; `None` unless the standard error of
    /// estimate is defined and the independent sample varies
    pub std_err_slope: Option<f64>,
}

/// Error statistics for the single equation and each month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateErrorsSet {
    /// The pooled single-equation errors
    pub single: EstimateErrors,
    /// Monthly errors, January first
    pub monthly: [EstimateErrors; 12],
}

impl EstimateErrorsSet {
    /// The error statistics for `month` (1-12)
    pub fn monthly(&self, month: u32) -> Option<&EstimateErrors> {
        if (1..=12).contains(&month) {
            Some(&self.monthly[(month - 1) as usize])
        } else {
            None
        }
    }
}

/// Threshold checks for one equation
///
/// Derived by comparing already-computed statistics against the configured
/// thresholds; nothing is recomputed here. An unset threshold makes its
/// check pass vacuously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegressionChecks {
    /// Paired sample size meets the minimum
    pub sample_size_ok: bool,
    /// |R| meets the minimum
    pub correlation_ok: bool,
    /// Slope differs from zero at the configured confidence level
    pub confidence_ok: bool,
}

/// Checks for the single equation and each month, plus the derived
/// usability masks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionChecksSet {
    /// The pooled single-equation checks
    pub single: RegressionChecks,
    /// Monthly checks, January first
    pub monthly: [RegressionChecks; 12],
    /// Whether the single equation is usable (fit OK and all checks pass)
    pub single_usable: bool,
    /// Per-month usability: month enabled, fit OK, and all checks pass
    pub monthly_usable: [bool; 12],
}

impl RegressionChecksSet {
    /// The checks for `month` (1-12)
    pub fn monthly(&self, month: u32) -> Option<&RegressionChecks> {
        if (1..=12).contains(&month) {
            Some(&self.monthly[(month - 1) as usize])
        } else {
            None
        }
    }

    /// Whether the equation for `month` (1-12) is usable
    pub fn is_month_usable(&self, month: u32) -> bool {
        (1..=12).contains(&month) && self.monthly_usable[(month - 1) as usize]
    }
}
