// Sample extraction: stage 1 of the regression pipeline

use super::{RegressionData, RegressionDataSet, RegressionOptions, Transformation};
use crate::series::TimeSeries;
use crate::temporal::Temporal;

#[derive(Default)]
struct Bucket {
    x: Vec<f64>,
    y: Vec<f64>,
    x_extended: Vec<f64>,
    y_extended: Vec<f64>,
}

impl Bucket {
    fn into_data(self) -> RegressionData {
        RegressionData::from_parts(self.x, self.y, self.x_extended, self.y_extended)
    }
}

/// Extract the pooled and monthly samples from the two series
///
/// A timestamp contributes a pair only when its month is enabled and both
/// series have a value there; the extended arrays relax the pairing and
/// require only their own series to be non-missing.
pub(crate) fn extract<T: Temporal>(
    x: &TimeSeries<T>,
    y: &TimeSeries<T>,
    options: &RegressionOptions<T>,
) -> RegressionDataSet {
    let (dep_start, dep_end) = options.dependent_range.unwrap_or((y.start(), y.end()));
    let (ind_start, ind_end) = options.independent_range.unwrap_or((x.start(), x.end()));
    let mask = &options.month_mask;

    let mut single = Bucket::default();
    let mut monthly: [Bucket; 12] = Default::default();

    // Paired sample and the dependent-side extended sample share one walk
    // over the dependent analysis range, on the dependent series' grid.
    for point in y.iter_range(&dep_start, &dep_end) {
        let month = point.date.month();
        if !mask.is_enabled(month) {
            continue;
        }
        let yv = match point.value {
            Some(yv) => yv,
            None => continue,
        };
        let bucket = &mut monthly[(month - 1) as usize];
        single.y_extended.push(yv);
        bucket.y_extended.push(yv);
        if let Some(xv) = x.get(&point.date) {
            single.x.push(xv);
            single.y.push(yv);
            bucket.x.push(xv);
            bucket.y.push(yv);
        }
    }

    // Independent-side extended sample walks the independent analysis range,
    // which may cover a longer record than the dependent series.
    for point in x.iter_range(&ind_start, &ind_end) {
        let month = point.date.month();
        if !mask.is_enabled(month) {
            continue;
        }
        if let Some(xv) = point.value {
            single.x_extended.push(xv);
            monthly[(month - 1) as usize].x_extended.push(xv);
        }
    }

    let monthly_data: [RegressionData; 12] = monthly.map(Bucket::into_data);
    RegressionDataSet::from_parts(single.into_data(), monthly_data)
}

/// Apply the configured transformation, if any
///
/// Returns `None` for [`Transformation::None`]: the untransformed data set
/// doubles as the transformed view, and no copy is made.
pub(crate) fn transform(
    data: &RegressionDataSet,
    transformation: Transformation,
    substitute: f64,
) -> Option<RegressionDataSet> {
    match transformation {
        Transformation::None => None,
        Transformation::Log10 => {
            let single = transform_data(data.single(), substitute);
            let monthly: [RegressionData; 12] = std::array::from_fn(|i| {
                transform_data(&data.monthly_all()[i], substitute)
            });
            Some(RegressionDataSet::from_parts(single, monthly))
        }
    }
}

fn transform_data(data: &RegressionData, substitute: f64) -> RegressionData {
    RegressionData::from_parts(
        log10_with_substitute(data.x(), substitute),
        log10_with_substitute(data.y(), substitute),
        log10_with_substitute(data.x_extended(), substitute),
        log10_with_substitute(data.y_extended(), substitute),
    )
}

fn log10_with_substitute(values: &[f64], substitute: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v <= 0.0 { substitute } else { v }.log10())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::{AnalysisMethod, MonthMask};
    use crate::temporal::Frequency;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        <NaiveDate as Temporal>::parse(s).unwrap()
    }

    fn series(start: &str, values: Vec<f64>) -> TimeSeries<NaiveDate> {
        TimeSeries::from_values(d(start), Frequency::Monthly, values).unwrap()
    }

    #[test]
    fn test_paired_extraction_skips_missing_on_either_side() {
        let x = series("2020-01-01", vec![1.0, f64::NAN, 3.0, 4.0]);
        let y = series("2020-01-01", vec![10.0, 20.0, f64::NAN, 40.0]);
        let options = RegressionOptions::default();
        let data = extract(&x, &y, &options);

        assert_eq!(data.single().x(), &[1.0, 4.0]);
        assert_eq!(data.single().y(), &[10.0, 40.0]);
        // Extended arrays only require their own series to be present
        assert_eq!(data.single().x_extended(), &[1.0, 3.0, 4.0]);
        assert_eq!(data.single().y_extended(), &[10.0, 20.0, 40.0]);
    }

    #[test]
    fn test_monthly_buckets_partition_the_single_sample() {
        // Two years of complete monthly data
        let values: Vec<f64> = (0..24).map(|i| i as f64).collect();
        let x = series("2020-01-01", values.clone());
        let y = series("2020-01-01", values.iter().map(|v| v * 2.0).collect());
        let data = extract(&x, &y, &RegressionOptions::default());

        assert_eq!(data.single().sample_size(), 24);
        let monthly_total: usize = (1..=12)
            .map(|m| data.monthly(m).unwrap().sample_size())
            .sum();
        assert_eq!(monthly_total, 24);
        for m in 1..=12 {
            assert_eq!(data.monthly(m).unwrap().sample_size(), 2);
        }
    }

    #[test]
    fn test_month_mask_restricts_single_sample() {
        let values: Vec<f64> = (0..24).map(|i| i as f64 + 1.0).collect();
        let x = series("2020-01-01", values.clone());
        let y = series("2020-01-01", values.clone());
        let mut options = RegressionOptions::default();
        options.month_mask = MonthMask::from_months(&[6]).unwrap();
        let data = extract(&x, &y, &options);

        // Only the two Junes contribute
        assert_eq!(data.single().sample_size(), 2);
        assert_eq!(data.monthly(6).unwrap().sample_size(), 2);
        for m in (1..=12).filter(|&m| m != 6) {
            assert!(data.monthly(m).unwrap().is_empty());
            assert!(data.monthly(m).unwrap().x_extended().is_empty());
        }
    }

    #[test]
    fn test_independent_range_can_exceed_dependent_record() {
        // Independent record is twice as long as the dependent one
        let x = series("2020-01-01", (0..24).map(|i| i as f64 + 1.0).collect());
        let y = series("2020-01-01", (0..12).map(|i| i as f64 + 1.0).collect());
        let options = RegressionOptions::new(AnalysisMethod::Move2);
        let data = extract(&x, &y, &options);

        assert_eq!(data.single().sample_size(), 12);
        assert_eq!(data.single().x_extended().len(), 24);
        assert_eq!(data.single().y_extended().len(), 12);
    }

    #[test]
    fn test_explicit_ranges() {
        let x = series("2020-01-01", (0..24).map(|i| i as f64 + 1.0).collect());
        let y = series("2020-01-01", (0..24).map(|i| i as f64 + 1.0).collect());
        let mut options: RegressionOptions<NaiveDate> = RegressionOptions::default();
        options.dependent_range = Some((d("2020-01-01"), d("2020-06-01")));
        options.independent_range = Some((d("2021-01-01"), d("2021-12-01")));
        let data = extract(&x, &y, &options);

        assert_eq!(data.single().sample_size(), 6);
        assert_eq!(data.single().x_extended().len(), 12);
    }

    #[test]
    fn test_log10_transform_with_substitute() {
        let x = series("2020-01-01", vec![1.0, 10.0, 100.0]);
        let y = series("2020-01-01", vec![-2.0, 1.0, 1000.0]);
        let data = extract(&x, &y, &RegressionOptions::default());
        let transformed = transform(&data, Transformation::Log10, 0.001).unwrap();

        assert_eq!(transformed.single().x(), &[0.0, 1.0, 2.0]);
        // -2.0 is replaced by the substitute before the transform
        assert_eq!(transformed.single().y(), &[-3.0, 0.0, 3.0]);
    }

    #[test]
    fn test_no_transform_shares_the_extracted_object() {
        let x = series("2020-01-01", vec![1.0, 2.0]);
        let y = series("2020-01-01", vec![1.0, 2.0]);
        let data = extract(&x, &y, &RegressionOptions::default());
        assert!(transform(&data, Transformation::None, 0.001).is_none());
    }
}
