//! Unit tests for close-of-bucket resampling

use chrono::Duration;
use cryptobit::error::EngineError;
use cryptobit::models::series::{PricePoint, Series};
use cryptobit::timeframes::resample;

use crate::support::{assert_close, linear, minute, minute_points, minute_series};

fn points_at(minutes: &[i64]) -> Vec<PricePoint> {
    minutes
        .iter()
        .map(|m| PricePoint::new(minute(*m), 100.0 + *m as f64))
        .collect()
}

#[test]
fn test_resample_keeps_bucket_close() {
    let series = minute_series(&linear(10, 1.0, 1.0));
    let five = resample(&series, 5).unwrap();

    assert_eq!(five.interval_minutes(), 5);
    assert_eq!(five.closes(), vec![5.0, 10.0]);
    assert_eq!(five.points()[0].timestamp, minute(4));
    assert_eq!(five.points()[1].timestamp, minute(9));
}

#[test]
fn test_leading_partial_bucket_is_dropped() {
    let series = Series::one_minute(points_at(&[2, 3, 4, 5, 6, 7, 8, 9])).unwrap();
    let five = resample(&series, 5).unwrap();
    assert_eq!(five.closes(), vec![109.0]);
}

#[test]
fn test_trailing_partial_bucket_is_dropped() {
    let series = minute_series(&linear(13, 1.0, 1.0));
    let five = resample(&series, 5).unwrap();
    assert_eq!(five.len(), 2);
}

#[test]
fn test_bucket_with_gap_is_dropped() {
    let series = Series::one_minute(points_at(&[0, 1, 2, 3, 4, 5, 6, 8, 9])).unwrap();
    let five = resample(&series, 5).unwrap();
    assert_eq!(five.closes(), vec![104.0]);
}

#[test]
fn test_sub_minute_samples_collapse_to_minute_close() {
    let points = vec![
        PricePoint::new(minute(0), 10.0),
        PricePoint::new(minute(0) + Duration::seconds(30), 11.0),
        PricePoint::new(minute(1), 12.0),
    ];
    let series = Series::one_minute(points).unwrap();
    let one = resample(&series, 1).unwrap();
    assert_eq!(one.closes(), vec![11.0, 12.0]);
}

#[test]
fn test_volume_summed_when_complete() {
    let points: Vec<PricePoint> = minute_points(&linear(5, 1.0, 1.0))
        .into_iter()
        .map(|p| p.with_volume(2.0))
        .collect();
    let five = resample(&Series::one_minute(points).unwrap(), 5).unwrap();
    assert_eq!(five.points()[0].volume, Some(10.0));
}

#[test]
fn test_rolling_volume_ratio_survives_resampling() {
    let points: Vec<_> = minute_points(&[100.0; 10])
        .into_iter()
        .enumerate()
        .map(|(i, p)| p.with_volume(if i < 5 { 1.0e9 } else { 1.8e9 + i as f64 * 1.0e7 }))
        .collect();
    let series = Series::one_minute(points).unwrap();
    let five = resample(&series, 5).unwrap();

    let volumes = five.volumes().unwrap();
    assert_eq!(volumes.len(), 2);
    let recent_average = (5..10).map(|i| 1.8e9 + i as f64 * 1.0e7).sum::<f64>() / 5.0;
    assert_close(volumes[1] / volumes[0], recent_average / 1.0e9);
}

#[test]
fn test_volume_dropped_when_any_point_lacks_it() {
    let mut points: Vec<PricePoint> = minute_points(&linear(5, 1.0, 1.0))
        .into_iter()
        .map(|p| p.with_volume(2.0))
        .collect();
    points[2].volume = None;
    let five = resample(&Series::one_minute(points).unwrap(), 5).unwrap();
    assert_eq!(five.points()[0].volume, None);
}

#[test]
fn test_reaggregation_is_idempotent() {
    let series = minute_series(&linear(47, 50.0, 0.25));
    let once = resample(&series, 15).unwrap();
    let twice = resample(&once, 15).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_incompatible_bucket_size() {
    let five = resample(&minute_series(&linear(10, 1.0, 1.0)), 5).unwrap();
    assert_eq!(
        resample(&five, 3),
        Err(EngineError::IncompatibleInterval {
            series_minutes: 5,
            bucket_minutes: 3,
        })
    );
    assert!(resample(&five, 0).is_err());
}

#[test]
fn test_empty_series_resamples_to_empty() {
    let empty = Series::one_minute(Vec::new()).unwrap();
    assert!(resample(&empty, 60).unwrap().is_empty());
}
