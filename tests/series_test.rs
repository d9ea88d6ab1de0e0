use chrono::NaiveDate;
use tsregrs::series::TimeSeries;
use tsregrs::temporal::{Frequency, Temporal};

fn d(s: &str) -> NaiveDate {
    <NaiveDate as Temporal>::parse(s).unwrap()
}

#[test]
fn test_series_creation_and_metadata() {
    let ts = TimeSeries::new(d("1995-01-01"), d("1995-12-01"), Frequency::Monthly)
        .unwrap()
        .with_name("gage-0371")
        .with_units("cfs")
        .with_description("monthly mean streamflow");

    assert_eq!(ts.len(), 12);
    assert_eq!(ts.name(), Some("gage-0371"));
    assert_eq!(ts.units(), Some("cfs"));
    assert_eq!(ts.description(), Some("monthly mean streamflow"));
    assert_eq!(ts.frequency(), Frequency::Monthly);
    // A fresh series is all missing
    assert_eq!(ts.count_non_missing(), 0);
}

#[test]
fn test_values_round_trip_through_dates() {
    let mut ts = TimeSeries::new(d("1995-01-01"), d("1995-12-01"), Frequency::Monthly).unwrap();
    for (i, m) in (1..=12).enumerate() {
        let date = NaiveDate::from_ymd_opt(1995, m, 1).unwrap();
        ts.set(&date, (i + 1) as f64 * 10.0).unwrap();
    }
    assert_eq!(ts.get(&d("1995-04-01")), Some(40.0));
    assert_eq!(ts.count_non_missing(), 12);
    assert_eq!(ts.values().len(), 12);
}

#[test]
fn test_missing_sentinel_and_nan() {
    let ts = TimeSeries::from_values(
        d("2000-01-01"),
        Frequency::Yearly,
        vec![-999.0, 12.5, f64::NAN, 7.0],
    )
    .unwrap()
    .with_missing_value(-999.0);

    assert_eq!(ts.get(&d("2000-01-01")), None);
    assert_eq!(ts.get(&d("2001-01-01")), Some(12.5));
    assert_eq!(ts.get(&d("2002-01-01")), None);
    assert_eq!(ts.get(&d("2003-01-01")), Some(7.0));
    assert_eq!(ts.count_non_missing(), 2);
    assert!(ts.is_missing_value(-999.0));
    assert!(ts.is_missing_value(f64::NAN));
    assert!(!ts.is_missing_value(0.0));
}

#[test]
fn test_out_of_period_access() {
    let mut ts =
        TimeSeries::from_values(d("2000-01-01"), Frequency::Monthly, vec![1.0, 2.0]).unwrap();
    assert_eq!(ts.get(&d("1999-12-01")), None);
    assert_eq!(ts.get(&d("2000-03-01")), None);
    assert!(ts.set(&d("2000-03-01"), 3.0).is_err());
}

#[test]
fn test_flags_travel_with_the_iterator() {
    let mut ts =
        TimeSeries::new(d("2000-01-01"), d("2000-03-01"), Frequency::Monthly).unwrap();
    ts.set(&d("2000-01-01"), 1.0).unwrap();
    ts.set_with_flag(&d("2000-02-01"), 2.0, "E").unwrap();

    let points: Vec<_> = ts.iter().collect();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].value, Some(1.0));
    assert_eq!(points[0].flag, None);
    assert_eq!(points[1].value, Some(2.0));
    assert_eq!(points[1].flag, Some("E"));
    assert_eq!(points[2].value, None);
}

#[test]
fn test_iter_range_is_chronological_and_clamped() {
    let values: Vec<f64> = (1..=24).map(|v| v as f64).collect();
    let ts = TimeSeries::from_values(d("2020-01-01"), Frequency::Monthly, values).unwrap();

    let window: Vec<_> = ts
        .iter_range(&d("2020-11-01"), &d("2021-02-01"))
        .map(|p| p.value.unwrap())
        .collect();
    assert_eq!(window, vec![11.0, 12.0, 13.0, 14.0]);

    let dates: Vec<_> = ts
        .iter_range(&d("2019-01-01"), &d("2020-02-15"))
        .map(|p| p.date)
        .collect();
    assert_eq!(dates, vec![d("2020-01-01"), d("2020-02-01")]);
}
