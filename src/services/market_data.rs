//! Collaborator interfaces the runtime polls each cycle.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::CoinConfig;
use crate::models::sentiment::SentimentReading;

/// Latest market snapshot for one coin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub change_24h: f64,
    /// Rolling 24h traded volume as reported at fetch time, not the volume
    /// traded since the previous sample. Only ratios between windows of these
    /// snapshots are meaningful.
    pub volume: Option<f64>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by upstream")]
    RateLimited,

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("unexpected payload: {0}")]
    Decode(String),
}

impl FeedError {
    /// Worth retrying within the same cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::Http(_) => true,
            FeedError::Status(status) => *status >= 500,
            FeedError::RateLimited | FeedError::Decode(_) => false,
        }
    }
}

#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Quotes keyed by the coin's display symbol. Coins the upstream did
    /// not return are simply absent.
    async fn fetch_quotes(&self, coins: &[CoinConfig]) -> Result<HashMap<String, Quote>, FeedError>;
}

#[async_trait]
pub trait SentimentSource: Send + Sync {
    async fn fetch_sentiment(&self) -> Result<SentimentReading, FeedError>;
}
