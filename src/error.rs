//! Error types for the signal engine.
//!
//! Insufficient history is deliberately absent here: indicators report it
//! as `None` and the scorer collapses it into a neutral result.

use thiserror::Error;

/// Rejection of a cycle's input. The caller keeps its previous result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("timestamp at index {index} is not strictly after its predecessor")]
    NonMonotonicTimestamp { index: usize },

    #[error("price at index {index} must be positive and finite, got {price}")]
    InvalidPrice { index: usize, price: f64 },

    #[error("volume at index {index} must be non-negative and finite, got {volume}")]
    InvalidVolume { index: usize, volume: f64 },

    #[error("series interval must be at least one minute, got {0}")]
    InvalidInterval(u32),

    #[error("cannot resample a {series_minutes}m series into {bucket_minutes}m buckets")]
    IncompatibleInterval {
        series_minutes: u32,
        bucket_minutes: u32,
    },
}

/// Invalid engine or service configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} period must be greater than zero")]
    InvalidPeriod { name: &'static str },

    #[error("{name}: fast period ({fast}) must be shorter than slow period ({slow})")]
    FastNotBelowSlow {
        name: &'static str,
        fast: u32,
        slow: u32,
    },

    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    #[error("at least one timeframe must be configured")]
    NoTimeframes,

    #[error("timeframe {label:?} is invalid: {reason}")]
    InvalidTimeframe { label: String, reason: String },

    #[error("weight for rule {rule} must be finite, got {weight}")]
    InvalidRuleWeight { rule: String, weight: f64 },

    #[error("sentiment weight {weight} must stay below the smallest timeframe contribution {limit}")]
    SentimentTooHeavy { weight: f64, limit: f64 },

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },
}
