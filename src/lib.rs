//! CryptoBit signal engine.
//!
//! Turns a one-minute price series into per-timeframe technical indicators
//! and a composite, explainable trading signal. The `services` and `core`
//! modules wrap the engine in a polling runtime and a JSON HTTP surface.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod timeframes;

pub use error::{ConfigError, EngineError};
pub use signals::engine::SignalEngine;
