// OLS / MOVE2 fitting: stage 2 of the regression pipeline

use super::{AnalysisMethod, RegressionData, RegressionDataSet, RegressionResults, RegressionResultsSet};

/// Result shape for a sample that cannot be fitted
fn degenerate() -> RegressionResults {
    RegressionResults {
        ok: false,
        intercept: f64::NAN,
        slope: f64::NAN,
        correlation: f64::NAN,
    }
}

/// Fit the single equation and all 12 monthly equations
///
/// Each equation is fitted independently from its own bucket; a degenerate
/// bucket yields a not-OK result without affecting the others.
pub(crate) fn fit_set(
    data: &RegressionDataSet,
    method: AnalysisMethod,
    force_zero_intercept: bool,
) -> RegressionResultsSet {
    RegressionResultsSet {
        single: fit_one(data.single(), method, force_zero_intercept),
        monthly: std::array::from_fn(|i| {
            fit_one(&data.monthly_all()[i], method, force_zero_intercept)
        }),
    }
}

/// Fit one equation; never fails, degenerate samples produce a not-OK result
pub(crate) fn fit_one(
    data: &RegressionData,
    method: AnalysisMethod,
    force_zero_intercept: bool,
) -> RegressionResults {
    let fitted = match method {
        AnalysisMethod::OlsRegression => fit_ols(data, force_zero_intercept),
        AnalysisMethod::Move2 => fit_move2(data),
    };
    // Any non-finite outcome is reported as a degenerate fit rather than
    // leaking NaN/inf behind an ok flag.
    match fitted {
        Some(r) if r.intercept.is_finite() && r.slope.is_finite() && r.correlation.is_finite() => r,
        _ => degenerate(),
    }
}

struct PairedMoments {
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

fn paired_moments(x: &[f64], y: &[f64]) -> PairedMoments {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    PairedMoments {
        mean_x,
        mean_y,
        sxx,
        syy,
        sxy,
    }
}

fn fit_ols(data: &RegressionData, force_zero_intercept: bool) -> Option<RegressionResults> {
    let x = data.x();
    let y = data.y();
    if x.len() < 2 {
        return None;
    }
    let m = paired_moments(x, y);
    if m.sxx <= 0.0 || m.syy <= 0.0 {
        return None;
    }
    let correlation = m.sxy / (m.sxx * m.syy).sqrt();

    let (intercept, slope) = if force_zero_intercept {
        let sum_x2 = x.iter().map(|&xi| xi * xi).sum::<f64>();
        if sum_x2 <= 0.0 {
            return None;
        }
        let sum_xy = x.iter().zip(y.iter()).map(|(&xi, &yi)| xi * yi).sum::<f64>();
        (0.0, sum_xy / sum_x2)
    } else {
        let slope = m.sxy / m.sxx;
        (m.mean_y - slope * m.mean_x, slope)
    };

    Some(RegressionResults {
        ok: true,
        intercept,
        slope,
        correlation,
    })
}

fn fit_move2(data: &RegressionData) -> Option<RegressionResults> {
    let x = data.x();
    let y = data.y();
    if x.len() < 2 {
        return None;
    }
    let m = paired_moments(x, y);
    if m.sxx <= 0.0 || m.syy <= 0.0 {
        return None;
    }
    let correlation = m.sxy / (m.sxx * m.syy).sqrt();

    // The variance-preserving relationship is anchored on each series' own
    // extended sample, not the paired one.
    let x2 = data.x_extended();
    let y2 = data.y_extended();
    if x2.len() < 2 || y2.len() < 2 {
        return None;
    }
    let (mean_x2, std_x2) = sample_mean_std(x2);
    let (mean_y2, std_y2) = sample_mean_std(y2);
    if std_x2 <= 0.0 || std_y2 <= 0.0 {
        return None;
    }
    let slope = correlation.signum() * std_y2 / std_x2;
    let intercept = mean_y2 - slope * mean_x2;

    Some(RegressionResults {
        ok: true,
        intercept,
        slope,
        correlation,
    })
}

fn sample_mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired(x: Vec<f64>, y: Vec<f64>) -> RegressionData {
        let x2 = x.clone();
        let y2 = y.clone();
        RegressionData::from_parts(x, y, x2, y2)
    }

    #[test]
    fn test_ols_exact_line() {
        let data = paired(
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 4.0, 6.0, 8.0, 10.0],
        );
        let r = fit_one(&data, AnalysisMethod::OlsRegression, false);
        assert!(r.ok);
        assert!(r.intercept.abs() < 1e-12);
        assert!((r.slope - 2.0).abs() < 1e-12);
        assert!((r.correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ols_with_intercept() {
        // y = 3 + 0.5 x with a little asymmetry to keep it non-trivial
        let x = vec![1.0, 2.0, 4.0, 8.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 + 0.5 * v).collect();
        let r = fit_one(&paired(x, y), AnalysisMethod::OlsRegression, false);
        assert!(r.ok);
        assert!((r.intercept - 3.0).abs() < 1e-12);
        assert!((r.slope - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ols_zero_x_variance_is_degenerate() {
        let data = paired(vec![1.0, 1.0, 1.0], vec![5.0, 3.0, 9.0]);
        let r = fit_one(&data, AnalysisMethod::OlsRegression, false);
        assert!(!r.ok);
        assert!(r.intercept.is_nan());
        assert!(r.slope.is_nan());
        assert!(r.correlation.is_nan());
    }

    #[test]
    fn test_ols_single_point_is_degenerate() {
        let data = paired(vec![1.0], vec![2.0]);
        assert!(!fit_one(&data, AnalysisMethod::OlsRegression, false).ok);
    }

    #[test]
    fn test_forced_zero_intercept() {
        // Noisy-ish data; through-origin slope is Σxy/Σx²
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![2.1, 3.9, 6.2, 7.8];
        let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
        let sum_x2: f64 = x.iter().map(|a| a * a).sum();
        let r = fit_one(&paired(x, y), AnalysisMethod::OlsRegression, true);
        assert!(r.ok);
        assert_eq!(r.intercept, 0.0);
        assert!((r.slope - sum_xy / sum_x2).abs() < 1e-12);
    }

    #[test]
    fn test_move2_preserves_extended_variance() {
        // Paired sample on the common period; extended samples differ
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![2.0, 4.0, 6.0, 8.0];
        let x2 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y2 = vec![2.0, 4.0, 6.0, 8.0];
        let data = RegressionData::from_parts(x, y, x2, y2.clone());
        let r = fit_one(&data, AnalysisMethod::Move2, false);
        assert!(r.ok);

        // slope = sign(r) * std(y2)/std(x2), intercept anchored on the means
        let (mean_x2, std_x2) = sample_mean_std(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let (mean_y2, std_y2) = sample_mean_std(&y2);
        assert!((r.slope - std_y2 / std_x2).abs() < 1e-12);
        assert!((r.intercept - (mean_y2 - r.slope * mean_x2)).abs() < 1e-12);
        assert!((r.correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_move2_negative_correlation_flips_slope() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![8.0, 6.0, 4.0, 2.0];
        let data = paired(x, y);
        let r = fit_one(&data, AnalysisMethod::Move2, false);
        assert!(r.ok);
        assert!(r.slope < 0.0);
        assert!((r.correlation + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_move2_short_extended_sample_is_degenerate() {
        let data = RegressionData::from_parts(
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![1.0],
            vec![2.0, 4.0, 6.0],
        );
        assert!(!fit_one(&data, AnalysisMethod::Move2, false).ok);
    }

    #[test]
    fn test_empty_bucket_is_degenerate_not_a_panic() {
        let data = RegressionData::default();
        let r = fit_one(&data, AnalysisMethod::OlsRegression, false);
        assert!(!r.ok);
        assert!(r.slope.is_nan());
    }
}
