//! Runtime settings for the polling service, read from the environment.

use serde::{Deserialize, Serialize};

use super::env_parse;
use crate::error::ConfigError;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_FEAR_GREED_URL: &str = "https://api.alternative.me";

/// Display symbol and the upstream id used to query it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinConfig {
    pub symbol: String,
    pub id: String,
}

impl CoinConfig {
    pub fn new(symbol: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            id: id.into(),
        }
    }

    /// Parse `BTC:bitcoin,ETH:ethereum`.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, ConfigError> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once(':') {
                Some((symbol, id)) if !symbol.trim().is_empty() && !id.trim().is_empty() => {
                    Ok(Self::new(symbol.trim().to_uppercase(), id.trim()))
                }
                _ => Err(ConfigError::InvalidEnv {
                    key: "COINS",
                    value: entry.to_string(),
                }),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub port: u16,
    pub refresh_interval_seconds: u64,
    pub coins: Vec<CoinConfig>,
    /// One-minute points retained per coin.
    pub history_limit: usize,
    /// Points exposed in the chart overlay.
    pub chart_points: usize,
    pub coingecko_url: String,
    pub fear_greed_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            refresh_interval_seconds: 15,
            coins: vec![
                CoinConfig::new("BTC", "bitcoin"),
                CoinConfig::new("ETH", "ethereum"),
                CoinConfig::new("SOL", "solana"),
                CoinConfig::new("TON", "toncoin"),
                CoinConfig::new("BNB", "binancecoin"),
            ],
            history_limit: 2400,
            chart_points: 150,
            coingecko_url: DEFAULT_COINGECKO_URL.to_string(),
            fear_greed_url: DEFAULT_FEAR_GREED_URL.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let coins = match std::env::var("COINS") {
            Ok(raw) if !raw.trim().is_empty() => CoinConfig::parse_list(&raw)?,
            _ => defaults.coins,
        };
        if coins.is_empty() {
            return Err(ConfigError::InvalidEnv {
                key: "COINS",
                value: String::new(),
            });
        }

        let refresh_interval_seconds =
            env_parse("REFRESH_INTERVAL_SECONDS", defaults.refresh_interval_seconds)?;
        if refresh_interval_seconds == 0 {
            return Err(ConfigError::InvalidEnv {
                key: "REFRESH_INTERVAL_SECONDS",
                value: "0".to_string(),
            });
        }

        let history_limit = env_parse("HISTORY_LIMIT", defaults.history_limit)?;
        if history_limit == 0 {
            return Err(ConfigError::InvalidEnv {
                key: "HISTORY_LIMIT",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            port: env_parse("PORT", defaults.port)?,
            refresh_interval_seconds,
            coins,
            history_limit,
            chart_points: env_parse("CHART_POINTS", defaults.chart_points)?,
            coingecko_url: std::env::var("COINGECKO_URL").unwrap_or(defaults.coingecko_url),
            fear_greed_url: std::env::var("FEAR_GREED_URL").unwrap_or(defaults.fear_greed_url),
        })
    }
}
