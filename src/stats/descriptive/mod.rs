// Descriptive statistics implementations

use crate::error::{Error, Result};

/// Arithmetic mean
pub(crate) fn mean_impl(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::EmptyData(
            "computing a mean needs at least one value".into(),
        ));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample variance with the n−1 denominator
pub(crate) fn variance_impl(data: &[f64]) -> Result<f64> {
    let n = data.len();
    if n < 2 {
        return Err(Error::InsufficientData(
            "computing a sample variance needs at least two values".into(),
        ));
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    let sum_sq = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
    Ok(sum_sq / (n - 1) as f64)
}

/// Sample standard deviation
pub(crate) fn std_dev_impl(data: &[f64]) -> Result<f64> {
    Ok(variance_impl(data)?.sqrt())
}

/// Sample covariance
pub(crate) fn covariance_impl(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch(format!(
            "covariance inputs differ in length: x={}, y={}",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(Error::InsufficientData(
            "computing a covariance needs at least two pairs".into(),
        ));
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let cov = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y))
        .sum::<f64>()
        / (n - 1) as f64;
    Ok(cov)
}

/// Pearson correlation coefficient
pub(crate) fn correlation_impl(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch(format!(
            "correlation inputs differ in length: x={}, y={}",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(Error::InsufficientData(
            "computing a correlation needs at least two pairs".into(),
        ));
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let numerator = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y))
        .sum::<f64>();

    let sum_sq_x = x.iter().map(|&xi| (xi - mean_x).powi(2)).sum::<f64>();
    let sum_sq_y = y.iter().map(|&yi| (yi - mean_y).powi(2)).sum::<f64>();

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator.abs() < f64::EPSILON {
        return Err(Error::ComputationError(
            "correlation undefined: a sample has zero variance".into(),
        ));
    }
    Ok(numerator / denominator)
}
