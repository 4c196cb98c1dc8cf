//! Engine and service configuration.
//!
//! The engine configuration is validated once, when the engine is built;
//! a bad weight table or threshold is a startup failure, never a per-cycle one.

pub mod engine;
pub mod service;

pub use engine::{
    EngineConfig, IndicatorParams, RuleThresholds, SentimentPolicy, TimeframeConfig,
};
pub use service::{CoinConfig, ServiceConfig};

use std::env;

/// Deployment environment from `APP_ENV` (defaults to `sandbox`).
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .map(|v| v.trim().to_lowercase())
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "sandbox".to_string())
}

pub fn is_production() -> bool {
    matches!(get_environment().as_str(), "production" | "prod")
}

pub(crate) fn env_parse<T: std::str::FromStr>(
    key: &'static str,
    default: T,
) -> Result<T, crate::error::ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| crate::error::ConfigError::InvalidEnv { key, value: raw }),
        _ => Ok(default),
    }
}
