// Relationship checks: stage 4 of the regression pipeline

use super::{
    EstimateErrors, EstimateErrorsSet, MonthMask, RegressionChecks, RegressionChecksSet,
    RegressionData, RegressionDataSet, RegressionResults, RegressionResultsSet,
};
use crate::stats;

/// Minimum paired sample size applied when the caller does not set one
pub(crate) const DEFAULT_MINIMUM_SAMPLE_SIZE: usize = 2;

pub(crate) struct CheckThresholds {
    pub minimum_sample_size: usize,
    pub minimum_correlation: Option<f64>,
    pub confidence_interval: Option<f64>,
}

/// Evaluate the checks for the single equation and every month
///
/// Statistics are only compared against thresholds here, never recomputed;
/// sample sizes come from the extracted data, correlations from the fit
/// results, and slope standard errors from the (transformed-units) error
/// estimates.
pub(crate) fn check_set(
    results: &RegressionResultsSet,
    data: &RegressionDataSet,
    errors: &EstimateErrorsSet,
    month_mask: &MonthMask,
    thresholds: &CheckThresholds,
) -> RegressionChecksSet {
    let single = check_one(&results.single, data.single(), &errors.single, thresholds);
    let monthly: [RegressionChecks; 12] = std::array::from_fn(|i| {
        check_one(
            &results.monthly[i],
            &data.monthly_all()[i],
            &errors.monthly[i],
            thresholds,
        )
    });

    let single_usable = results.single.ok && passes(&single);
    let monthly_usable: [bool; 12] = std::array::from_fn(|i| {
        month_mask.is_enabled(i as u32 + 1) && results.monthly[i].ok && passes(&monthly[i])
    });

    RegressionChecksSet {
        single,
        monthly,
        single_usable,
        monthly_usable,
    }
}

fn passes(checks: &RegressionChecks) -> bool {
    checks.sample_size_ok && checks.correlation_ok && checks.confidence_ok
}

fn check_one(
    results: &RegressionResults,
    data: &RegressionData,
    errors: &EstimateErrors,
    thresholds: &CheckThresholds,
) -> RegressionChecks {
    let n = data.sample_size();
    let sample_size_ok = n >= thresholds.minimum_sample_size;

    // NaN correlation (degenerate fit) fails any configured threshold.
    let correlation_ok = match thresholds.minimum_correlation {
        None => true,
        Some(min_r) => results.correlation.abs() >= min_r,
    };

    let confidence_ok = match thresholds.confidence_interval {
        None => true,
        Some(level) => slope_significant(results, errors, n, level),
    };

    RegressionChecks {
        sample_size_ok,
        correlation_ok,
        confidence_ok,
    }
}

/// Two-tailed Student-t test of the slope against zero
fn slope_significant(
    results: &RegressionResults,
    errors: &EstimateErrors,
    n: usize,
    confidence_percent: f64,
) -> bool {
    let se = match errors.std_err_slope {
        Some(se) if se > 0.0 => se,
        _ => return false,
    };
    if n <= 2 {
        return false;
    }
    let df = (n - 2) as f64;
    let t_stat = results.slope / se;
    if !t_stat.is_finite() {
        return false;
    }
    let p_value = 2.0 * (1.0 - stats::t_cdf(t_stat.abs(), df));
    let alpha = (100.0 - confidence_percent) / 100.0;
    p_value <= alpha
}
