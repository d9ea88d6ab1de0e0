// Pipeline orchestration for a configured regression analysis

use super::checks::{self, CheckThresholds, DEFAULT_MINIMUM_SAMPLE_SIZE};
use super::{
    data, estimate, fit, AnalysisMethod, EstimateErrorsSet, RegressionChecksSet, RegressionDataSet,
    RegressionOptions, RegressionResultsSet, Transformation,
};
use crate::error::{Error, Result};
use crate::series::TimeSeries;
use crate::temporal::Temporal;
use log::{debug, warn};

/// A configured regression analysis between two time series
///
/// Construction validates the configuration and never leaves a partial
/// object. The four pipeline stages are triggered by explicit calls (or all
/// at once by [`analyze`](Self::analyze)) and cache their outputs; re-running
/// a stage overwrites its cache. A value is not safe for concurrent
/// mutation; give each thread its own analysis.
#[derive(Debug)]
pub struct TimeSeriesRegression<'a, T: Temporal> {
    independent: &'a TimeSeries<T>,
    dependent: &'a TimeSeries<T>,
    options: RegressionOptions<T>,
    data: Option<RegressionDataSet>,
    transformed_data: Option<RegressionDataSet>,
    results: Option<RegressionResultsSet>,
    errors: Option<EstimateErrorsSet>,
    errors_transformed: Option<EstimateErrorsSet>,
    checks: Option<RegressionChecksSet>,
}

impl<'a, T: Temporal> TimeSeriesRegression<'a, T> {
    /// Create an analysis of `dependent` against `independent`
    pub fn new(
        independent: &'a TimeSeries<T>,
        dependent: &'a TimeSeries<T>,
        options: RegressionOptions<T>,
    ) -> Result<Self> {
        if independent.frequency() != dependent.frequency() {
            return Err(Error::DimensionMismatch(format!(
                "series frequencies differ: independent={}, dependent={}",
                independent.frequency(),
                dependent.frequency()
            )));
        }
        if let Some(intercept) = options.intercept {
            if intercept != 0.0 {
                return Err(Error::InvalidValue(format!(
                    "only a forced intercept of 0 is supported, got {}",
                    intercept
                )));
            }
            if options.method != AnalysisMethod::OlsRegression {
                return Err(Error::InvalidOperation(
                    "a forced intercept requires OLS regression".into(),
                ));
            }
            if options.transformation == Transformation::Log10 {
                return Err(Error::InvalidOperation(
                    "a forced intercept cannot be combined with a log10 transform".into(),
                ));
            }
        }
        if options.transformation == Transformation::Log10 && options.log_substitute <= 0.0 {
            return Err(Error::InvalidValue(format!(
                "log substitute must be positive, got {}",
                options.log_substitute
            )));
        }
        if let Some(min_r) = options.minimum_correlation {
            if !(0.0..=1.0).contains(&min_r) {
                return Err(Error::InvalidValue(format!(
                    "minimum correlation must be in [0, 1], got {}",
                    min_r
                )));
            }
        }
        if let Some(level) = options.confidence_interval {
            if !(0.0 < level && level < 100.0) {
                return Err(Error::InvalidValue(format!(
                    "confidence interval must be a percentage in (0, 100), got {}",
                    level
                )));
            }
        }
        for range in [&options.dependent_range, &options.independent_range]
            .into_iter()
            .flatten()
        {
            if range.0 > range.1 {
                return Err(Error::InvalidValue(format!(
                    "analysis range start {:?} is after its end {:?}",
                    range.0, range.1
                )));
            }
        }

        Ok(TimeSeriesRegression {
            independent,
            dependent,
            options,
            data: None,
            transformed_data: None,
            results: None,
            errors: None,
            errors_transformed: None,
            checks: None,
        })
    }

    /// The analysis configuration
    pub fn options(&self) -> &RegressionOptions<T> {
        &self.options
    }

    /// The independent series
    pub fn independent(&self) -> &TimeSeries<T> {
        self.independent
    }

    /// The dependent series
    pub fn dependent(&self) -> &TimeSeries<T> {
        self.dependent
    }

    /// Stage 1: extract the pooled and monthly samples
    pub fn extract_data(&mut self) -> Result<()> {
        let extracted = data::extract(self.independent, self.dependent, &self.options);
        debug!(
            "extracted {} paired observations over {} enabled month(s)",
            extracted.single().sample_size(),
            self.options.month_mask.enabled_months().len()
        );
        self.transformed_data = data::transform(
            &extracted,
            self.options.transformation,
            self.options.log_substitute,
        );
        self.data = Some(extracted);
        // Later stages are stale now
        self.results = None;
        self.errors = None;
        self.errors_transformed = None;
        self.checks = None;
        Ok(())
    }

    /// Stage 2: fit the single and monthly equations
    pub fn calculate_regression(&mut self) -> Result<()> {
        let fit_input = self
            .transformed_view()
            .ok_or_else(|| Error::InvalidOperation("no extracted data: run extract_data first".into()))?;
        let results = fit::fit_set(
            fit_input,
            self.options.method,
            self.options.intercept.is_some(),
        );
        if !results.single.ok {
            warn!("single-equation {} fit is degenerate", self.options.method);
        }
        for month in self.options.month_mask.enabled_months() {
            if !results.monthly[(month - 1) as usize].ok {
                warn!("month {} {} fit is degenerate", month, self.options.method);
            }
        }
        self.results = Some(results);
        self.errors = None;
        self.errors_transformed = None;
        self.checks = None;
        Ok(())
    }

    /// Stage 3: re-estimate the fitting samples and compute error statistics
    pub fn estimate_errors(&mut self) -> Result<()> {
        let results = self
            .results
            .as_ref()
            .ok_or_else(|| Error::InvalidOperation("no fit results: run calculate_regression first".into()))?;
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| Error::InvalidOperation("no extracted data: run extract_data first".into()))?;
        let transformed = self.transformed_data.as_ref().unwrap_or(data);
        let (orig, trans) =
            estimate::estimate_set(results, data, transformed, self.options.transformation);
        self.errors = Some(orig);
        self.errors_transformed = Some(trans);
        self.checks = None;
        Ok(())
    }

    /// Stage 4: evaluate the relationship checks
    pub fn run_checks(&mut self) -> Result<()> {
        let results = self
            .results
            .as_ref()
            .ok_or_else(|| Error::InvalidOperation("no fit results: run calculate_regression first".into()))?;
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| Error::InvalidOperation("no extracted data: run extract_data first".into()))?;
        let errors = self
            .errors_transformed
            .as_ref()
            .ok_or_else(|| Error::InvalidOperation("no error estimates: run estimate_errors first".into()))?;
        let thresholds = CheckThresholds {
            minimum_sample_size: self
                .options
                .minimum_sample_size
                .unwrap_or(DEFAULT_MINIMUM_SAMPLE_SIZE),
            minimum_correlation: self.options.minimum_correlation,
            confidence_interval: self.options.confidence_interval,
        };
        self.checks = Some(checks::check_set(
            results,
            data,
            errors,
            &self.options.month_mask,
            &thresholds,
        ));
        Ok(())
    }

    /// Run all four stages in order
    pub fn analyze(&mut self) -> Result<()> {
        self.extract_data()?;
        self.calculate_regression()?;
        self.estimate_errors()?;
        self.run_checks()
    }

    /// The extracted samples, once stage 1 has run
    pub fn data(&self) -> Option<&RegressionDataSet> {
        self.data.as_ref()
    }

    /// The samples the fit operates on: the transformed data when a
    /// transformation is configured, otherwise the extracted data itself
    pub fn transformed_data(&self) -> Option<&RegressionDataSet> {
        self.transformed_view()
    }

    /// The fit results, once stage 2 has run
    pub fn results(&self) -> Option<&RegressionResultsSet> {
        self.results.as_ref()
    }

    /// Error statistics in original data units, once stage 3 has run
    pub fn errors(&self) -> Option<&EstimateErrorsSet> {
        self.errors.as_ref()
    }

    /// Error statistics in the fitting (transformed) units, once stage 3 has
    /// run; identical to [`errors`](Self::errors) without a transformation
    pub fn errors_transformed(&self) -> Option<&EstimateErrorsSet> {
        self.errors_transformed.as_ref()
    }

    /// The relationship checks, once stage 4 has run
    pub fn checks(&self) -> Option<&RegressionChecksSet> {
        self.checks.as_ref()
    }

    fn transformed_view(&self) -> Option<&RegressionDataSet> {
        match self.options.transformation {
            Transformation::None => self.data.as_ref(),
            Transformation::Log10 => self.transformed_data.as_ref(),
        }
    }
}
