//! Upstream collaborators: price feed and Fear & Greed sentiment.

pub mod coingecko;
pub mod fear_greed;
pub mod market_data;

pub use coingecko::CoinGeckoClient;
pub use fear_greed::FearGreedClient;
pub use market_data::{FeedError, PriceFeed, Quote, SentimentSource};
