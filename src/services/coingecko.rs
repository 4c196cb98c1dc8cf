//! CoinGecko `/coins/markets` price feed

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::CoinConfig;
use crate::services::market_data::{FeedError, PriceFeed, Quote};

const USER_AGENT: &str = "CryptoBitTracker/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct MarketEntry {
    id: String,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    total_volume: Option<f64>,
}

pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
    backoff: ExponentialBuilder,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            backoff: ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(200))
                .with_max_times(2),
        }
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.backoff = self.backoff.with_max_times(retries);
        self
    }

    async fn fetch_once(&self, coins: &[CoinConfig]) -> Result<HashMap<String, Quote>, FeedError> {
        let ids = coins
            .iter()
            .map(|c| c.id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .get(format!("{}/coins/markets", self.base_url))
            .query(&[
                ("vs_currency", "usd"),
                ("ids", ids.as_str()),
                ("price_change_percentage", "24h"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FeedError::RateLimited);
        }
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let entries: Vec<MarketEntry> = response
            .json()
            .await
            .map_err(|e| FeedError::Decode(e.to_string()))?;

        let mut quotes = HashMap::new();
        for entry in entries {
            let Some(coin) = coins.iter().find(|c| c.id == entry.id) else {
                continue;
            };
            let Some(price) = entry.current_price else {
                debug!(coin = %coin.symbol, "CoinGecko entry without price, skipping");
                continue;
            };
            quotes.insert(
                coin.symbol.clone(),
                Quote {
                    price,
                    change_24h: entry.price_change_percentage_24h.unwrap_or(0.0),
                    volume: entry.total_volume,
                },
            );
        }
        Ok(quotes)
    }
}

#[async_trait]
impl PriceFeed for CoinGeckoClient {
    async fn fetch_quotes(&self, coins: &[CoinConfig]) -> Result<HashMap<String, Quote>, FeedError> {
        if coins.is_empty() {
            return Ok(HashMap::new());
        }
        (|| self.fetch_once(coins))
            .retry(self.backoff.clone())
            .when(FeedError::is_transient)
            .notify(|err: &FeedError, delay: Duration| {
                warn!(error = %err, retry_in_ms = delay.as_millis() as u64, "CoinGecko request failed, retrying");
            })
            .await
    }
}
