//! Unit tests for engine configuration

use std::path::PathBuf;

use cryptobit::config::{EngineConfig, TimeframeConfig};
use cryptobit::error::ConfigError;
use cryptobit::signals::rules::RuleId;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cryptobit-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_default_config_is_valid() {
    let config = EngineConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.multiplier_for("1m"), Some(0.5));
    assert_eq!(config.multiplier_for("1h"), Some(1.5));
    assert_eq!(config.multiplier_for("4h"), None);
}

#[test]
fn test_missing_weights_fall_back_to_defaults() {
    let mut config = EngineConfig::default();
    config.rule_weights.clear();
    assert_eq!(config.weight_for(RuleId::RsiOverbought), -22.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_rejects_zero_period() {
    let mut config = EngineConfig::default();
    config.indicators.rsi_period = 0;
    assert_eq!(
        config.validate(),
        Err(ConfigError::InvalidPeriod { name: "rsi" })
    );
}

#[test]
fn test_rejects_fast_not_below_slow() {
    let mut config = EngineConfig::default();
    config.indicators.ema_fast = 26;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::FastNotBelowSlow { name: "ema", .. })
    ));
}

#[test]
fn test_rejects_bad_timeframes() {
    let mut config = EngineConfig::default();
    config.timeframes.push(TimeframeConfig::new("5m", 5, 1.0));
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTimeframe { .. })
    ));

    let mut config = EngineConfig::default();
    config.timeframes[0].multiplier = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTimeframe { .. })
    ));

    let mut config = EngineConfig::default();
    config.timeframes[1].minutes = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTimeframe { .. })
    ));
}

#[test]
fn test_rejects_non_finite_weight() {
    let mut config = EngineConfig::default();
    config.rule_weights.insert(RuleId::EmaBullish, f64::NAN);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRuleWeight { .. })
    ));
}

#[test]
fn test_rejects_inverted_decision_thresholds() {
    let config = EngineConfig {
        entry_threshold: 70.0,
        strong_threshold: 60.0,
        ..EngineConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { .. })
    ));
}

#[test]
fn test_rejects_unordered_rsi_thresholds() {
    let mut config = EngineConfig::default();
    config.thresholds.rsi_oversold = 80.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { .. })
    ));
}

#[test]
fn test_rejects_structure_threshold_outside_rsi_range() {
    let mut config = EngineConfig::default();
    config.thresholds.rsi_bullish_structure = 140.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange {
            name: "rsi_bullish_structure",
            ..
        })
    ));
}

#[test]
fn test_structure_rule_defaults_to_hour_scope() {
    let config = EngineConfig::default();
    assert_eq!(
        config.scope_for(RuleId::RsiBullishStructure),
        Some(vec!["1h".to_string()])
    );
    assert_eq!(config.scope_for(RuleId::RsiOversold), None);
}

#[test]
fn test_sentiment_cannot_outweigh_a_timeframe() {
    // heaviest rule 25 on the lightest timeframe 0.5 gives 12.5
    let mut config = EngineConfig::default();
    config.sentiment.weight = 12.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::SentimentTooHeavy { .. })
    ));

    config.sentiment.weight = 12.0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_file_keeps_defaults() {
    let path = temp_file(
        "partial.json",
        r#"{
            "entry_threshold": 25,
            "rule_weights": { "ema_bullish": 30 },
            "timeframes": [{ "label": "5m", "minutes": 5, "multiplier": 1.0 }]
        }"#,
    );
    let config = EngineConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.entry_threshold, 25.0);
    assert_eq!(config.strong_threshold, 60.0);
    assert_eq!(config.weight_for(RuleId::EmaBullish), 30.0);
    assert_eq!(config.weight_for(RuleId::EmaBearish), -20.0);
    assert_eq!(config.timeframes.len(), 1);
    assert_eq!(config.indicators.ema_slow, 26);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_is_io_error() {
    let result = EngineConfig::from_json_file("/nonexistent/cryptobit/engine.json");
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let path = temp_file("broken.json", "{ not json");
    let result = EngineConfig::from_json_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}
