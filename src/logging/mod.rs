//! Logging initialization
//!
//! Production emits JSON lines for log aggregation; every other environment
//! gets coloured, human-readable output. `LOG_FORMAT=json|pretty` overrides
//! the environment default and `RUST_LOG` sets the filter (default `info`).

use std::env;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").map(|v| v.to_lowercase()) {
            Ok(v) if v == "json" => LogFormat::Json,
            Ok(v) if v == "pretty" => LogFormat::Pretty,
            _ if config::is_production() => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(environment = %config::get_environment(), "logging initialized");
    }
}
