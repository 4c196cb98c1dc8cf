//! Unit tests for the signal engine entry point

use cryptobit::config::EngineConfig;
use cryptobit::error::{ConfigError, EngineError};
use cryptobit::models::series::{PricePoint, Series};
use cryptobit::models::signal::{SignalDirection, SignalResult};
use cryptobit::SignalEngine;

use crate::support::{linear, minute, minute_points, minute_series};

fn engine() -> SignalEngine {
    SignalEngine::new(EngineConfig::default()).expect("default config is valid")
}

fn assert_cold_start(result: &SignalResult) {
    assert_eq!(result.direction, SignalDirection::Neutral);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.reasons, vec!["insufficient data".to_string()]);
}

#[test]
fn test_empty_series_is_cold_start() {
    let series = Series::one_minute(Vec::new()).unwrap();
    let result = engine().evaluate(&series, None).unwrap();
    assert_cold_start(&result);
    assert_eq!(result.timeframes.len(), 4);
}

#[test]
fn test_single_point_is_cold_start() {
    let result = engine()
        .evaluate_points(minute_points(&[42_000.0]), None)
        .unwrap();
    assert_cold_start(&result);
}

#[test]
fn test_malformed_points_are_rejected() {
    let points = vec![
        PricePoint::new(minute(1), 100.0),
        PricePoint::new(minute(0), 101.0),
    ];
    assert_eq!(
        engine().evaluate_points(points, None),
        Err(EngineError::NonMonotonicTimestamp { index: 1 })
    );

    let mut points = minute_points(&[100.0, 101.0]);
    points[0].price = -1.0;
    assert!(matches!(
        engine().evaluate_points(points, None),
        Err(EngineError::InvalidPrice { index: 0, .. })
    ));
}

#[test]
fn test_invalid_config_is_fatal() {
    let config = EngineConfig {
        timeframes: Vec::new(),
        ..EngineConfig::default()
    };
    assert_eq!(
        SignalEngine::new(config).err(),
        Some(ConfigError::NoTimeframes)
    );
}

#[test]
fn test_views_follow_configured_timeframes() {
    let series = minute_series(&linear(60, 100.0, 0.1));
    let views = engine().build_views(&series).unwrap();

    let shape: Vec<(&str, usize)> = views
        .iter()
        .map(|v| (v.label.as_str(), v.series.len()))
        .collect();
    assert_eq!(shape, vec![("1m", 60), ("5m", 12), ("15m", 4), ("1h", 1)]);
}

#[test]
fn test_evaluation_is_deterministic() {
    let prices: Vec<f64> = (0..180)
        .map(|i| 100.0 + (i as f64 * 0.21).sin() * 3.0)
        .collect();
    let series = minute_series(&prices);
    let engine = engine();
    assert_eq!(
        engine.evaluate(&series, None).unwrap(),
        engine.evaluate(&series, None).unwrap()
    );
}

#[test]
fn test_result_serializes_flat() {
    let series = minute_series(&linear(40, 100.0, 0.5));
    let result = engine().evaluate(&series, None).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["direction"].is_string());
    assert!(json["confidence"].is_number());
    assert!(json["composite_score"].is_number());
    assert!(json["reasons"].is_array());
    assert_eq!(json["timeframes"][0]["label"], "1m");
    assert!(json["timeframes"][0]["indicators"]["ema_fast"].is_number());
}
