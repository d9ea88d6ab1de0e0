// Error estimation: stage 3 of the regression pipeline

use super::{
    EstimateErrors, EstimateErrorsSet, RegressionData, RegressionDataSet, RegressionResults,
    RegressionResultsSet, Transformation,
};

/// Re-estimate every fitting sample and compute the error statistics
///
/// Returns `(original_units, transformed_units)`. The fit was performed on
/// the transformed sample, so the transformed set measures what the fit
/// actually minimized; the original-units set measures the estimates after
/// undoing the transform. Without a transform the two sets are numerically
/// identical.
pub(crate) fn estimate_set(
    results: &RegressionResultsSet,
    data: &RegressionDataSet,
    transformed: &RegressionDataSet,
    transformation: Transformation,
) -> (EstimateErrorsSet, EstimateErrorsSet) {
    let (single_orig, single_trans) = estimate_one(
        &results.single,
        data.single(),
        transformed.single(),
        transformation,
    );
    let mut monthly_orig: [EstimateErrors; 12] = Default::default();
    let mut monthly_trans: [EstimateErrors; 12] = Default::default();
    for i in 0..12 {
        let (orig, trans) = estimate_one(
            &results.monthly[i],
            &data.monthly_all()[i],
            &transformed.monthly_all()[i],
            transformation,
        );
        monthly_orig[i] = orig;
        monthly_trans[i] = trans;
    }
    (
        EstimateErrorsSet {
            single: single_orig,
            monthly: monthly_orig,
        },
        EstimateErrorsSet {
            single: single_trans,
            monthly: monthly_trans,
        },
    )
}

fn estimate_one(
    results: &RegressionResults,
    data: &RegressionData,
    transformed: &RegressionData,
    transformation: Transformation,
) -> (EstimateErrors, EstimateErrors) {
    if !results.ok || transformed.is_empty() {
        return (EstimateErrors::default(), EstimateErrors::default());
    }

    // Estimates in the space the fit was performed in.
    let estimates_trans: Vec<f64> = transformed
        .x()
        .iter()
        .map(|&x| results.intercept + results.slope * x)
        .collect();
    let errors_trans = error_stats(estimates_trans.clone(), transformed.y(), transformed.x());

    // Estimates mapped back to original data units.
    let estimates_orig: Vec<f64> = match transformation {
        Transformation::None => estimates_trans,
        Transformation::Log10 => estimates_trans.iter().map(|&e| 10f64.powf(e)).collect(),
    };
    let errors_orig = error_stats(estimates_orig, data.y(), data.x());

    (errors_orig, errors_trans)
}

fn error_stats(estimates: Vec<f64>, y: &[f64], x: &[f64]) -> EstimateErrors {
    let n = estimates.len();
    let sum_sq_err: f64 = estimates
        .iter()
        .zip(y.iter())
        .map(|(&est, &obs)| (est - obs).powi(2))
        .sum();

    let rmse = if n > 0 {
        Some((sum_sq_err / n as f64).sqrt())
    } else {
        None
    };
    let std_err_estimate = if n > 2 {
        Some((sum_sq_err / (n - 2) as f64).sqrt())
    } else {
        None
    };
    let std_err_slope = std_err_estimate.and_then(|see| {
        let mean_x = x.iter().sum::<f64>() / n as f64;
        let sxx: f64 = x.iter().map(|&xi| (xi - mean_x).powi(2)).sum();
        if sxx > 0.0 {
            Some(see / sxx.sqrt())
        } else {
            None
        }
    });

    EstimateErrors {
        estimates,
        rmse,
        std_err_estimate,
        std_err_slope,
    }
}
