//! alternative.me Fear & Greed index

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::sentiment::SentimentReading;
use crate::services::market_data::{FeedError, SentimentSource};

#[derive(Debug, Deserialize)]
struct FngResponse {
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    value: String,
    #[serde(default)]
    value_classification: Option<String>,
}

pub struct FearGreedClient {
    base_url: String,
    client: reqwest::Client,
}

impl FearGreedClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(8))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl SentimentSource for FearGreedClient {
    async fn fetch_sentiment(&self) -> Result<SentimentReading, FeedError> {
        let response = self
            .client
            .get(format!("{}/fng/", self.base_url))
            .query(&[("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body: FngResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Decode(e.to_string()))?;
        let entry = body
            .data
            .into_iter()
            .next()
            .ok_or_else(|| FeedError::Decode("empty data array".to_string()))?;
        let value: u8 = entry
            .value
            .trim()
            .parse()
            .map_err(|_| FeedError::Decode(format!("invalid index value {:?}", entry.value)))?;

        Ok(match entry.value_classification {
            Some(label) if !label.trim().is_empty() => SentimentReading::new(value, label),
            _ => SentimentReading::from_value(value),
        })
    }
}
