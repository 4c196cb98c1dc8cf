//! Refresh runtime: polls the price feed and sentiment source on a fixed
//! interval, keeps a bounded one-minute history per coin and publishes one
//! engine result per coin per cycle.
//!
//! A single task owns every history buffer, so at most one engine pass per
//! coin is ever in flight. Ticks that arrive while a cycle is still running
//! are skipped rather than queued.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::{CoinConfig, ServiceConfig};
use crate::indicators::ema_series;
use crate::metrics::Metrics;
use crate::models::sentiment::SentimentReading;
use crate::models::series::PricePoint;
use crate::models::signal::SignalResult;
use crate::services::market_data::{FeedError, PriceFeed, Quote, SentimentSource};
use crate::signals::engine::SignalEngine;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub refresh_interval: Duration,
    pub coins: Vec<CoinConfig>,
    pub history_limit: usize,
    pub chart_points: usize,
}

impl From<&ServiceConfig> for RuntimeConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            refresh_interval: Duration::from_secs(config.refresh_interval_seconds),
            coins: config.coins.clone(),
            history_limit: config.history_limit,
            chart_points: config.chart_points,
        }
    }
}

/// Recent prices with fast/slow EMA overlays, aligned index for index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub prices: Vec<f64>,
    pub ema_fast: Vec<Option<f64>>,
    pub ema_slow: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinSnapshot {
    pub coin: String,
    pub price: f64,
    pub change_24h: f64,
    pub signal: SignalResult,
    pub chart: ChartData,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub dashboard: Vec<CoinSnapshot>,
    pub fear_greed: Option<SentimentReading>,
    pub timestamp: Option<DateTime<Utc>>,
}

pub type SharedSnapshot = Arc<RwLock<DashboardSnapshot>>;

/// Consecutive skipped cycles after which the service reports degraded.
pub const DEGRADED_AFTER_SKIPS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub consecutive_skips: u32,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            consecutive_skips: 0,
        }
    }
}

pub type SharedHealth = Arc<RwLock<HealthStatus>>;

/// What one refresh cycle did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub evaluated: usize,
    pub rejected: usize,
    pub missing: usize,
    pub skipped: bool,
}

/// Bounded one-minute history. A sample landing in the same minute as the
/// newest point replaces it, so the buffer holds one close per minute.
#[derive(Debug, Clone)]
struct PriceHistory {
    points: VecDeque<PricePoint>,
    limit: usize,
}

impl PriceHistory {
    fn new(limit: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(limit),
            limit,
        }
    }

    fn same_minute(a: &PricePoint, b: &PricePoint) -> bool {
        a.timestamp.timestamp().div_euclid(60) == b.timestamp.timestamp().div_euclid(60)
    }

    /// The window the engine would see if `point` were committed.
    fn candidate(&self, point: PricePoint) -> Vec<PricePoint> {
        let mut window: Vec<PricePoint> = self.points.iter().copied().collect();
        match window.last() {
            Some(last) if Self::same_minute(last, &point) => {
                let end = window.len() - 1;
                window[end] = point;
            }
            _ => window.push(point),
        }
        let excess = window.len().saturating_sub(self.limit);
        window.drain(..excess);
        window
    }

    fn commit(&mut self, window: Vec<PricePoint>) {
        self.points = window.into();
    }

    fn prices(&self, last_n: usize) -> Vec<f64> {
        let skip = self.points.len().saturating_sub(last_n);
        self.points.iter().skip(skip).map(|p| p.price).collect()
    }
}

pub struct SignalRuntime {
    config: RuntimeConfig,
    engine: SignalEngine,
    feed: Arc<dyn PriceFeed>,
    sentiment_source: Arc<dyn SentimentSource>,
    histories: HashMap<String, PriceHistory>,
    latest: HashMap<String, CoinSnapshot>,
    sentiment: Option<SentimentReading>,
    snapshot: SharedSnapshot,
    health: SharedHealth,
    metrics: Option<Arc<Metrics>>,
}

impl SignalRuntime {
    pub fn new(
        config: RuntimeConfig,
        engine: SignalEngine,
        feed: Arc<dyn PriceFeed>,
        sentiment_source: Arc<dyn SentimentSource>,
    ) -> Self {
        Self {
            config,
            engine,
            feed,
            sentiment_source,
            histories: HashMap::new(),
            latest: HashMap::new(),
            sentiment: None,
            snapshot: Arc::new(RwLock::new(DashboardSnapshot::default())),
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Handle readers use to fetch the latest published dashboard.
    pub fn snapshot(&self) -> SharedSnapshot {
        self.snapshot.clone()
    }

    /// Handle the health endpoint reads; degraded after
    /// [`DEGRADED_AFTER_SKIPS`] skipped cycles in a row.
    pub fn health(&self) -> SharedHealth {
        self.health.clone()
    }

    /// Refresh forever on the configured interval.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.config.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            coins = self.config.coins.len(),
            interval_secs = self.config.refresh_interval.as_secs(),
            "SignalRuntime: refresh loop started"
        );

        loop {
            ticker.tick().await;
            let summary = self.refresh_once(Utc::now()).await;
            debug!(?summary, "SignalRuntime: cycle finished");
        }
    }

    /// One fetch-evaluate-publish cycle stamped at `now`.
    pub async fn refresh_once(&mut self, now: DateTime<Utc>) -> CycleSummary {
        let quotes = match self.feed.fetch_quotes(&self.config.coins).await {
            Ok(quotes) => quotes,
            Err(err) => {
                self.record_upstream_error();
                match err {
                    FeedError::RateLimited => warn!("Rate limited by price feed, skipping cycle"),
                    other => warn!(error = %other, "Price fetch failed, skipping cycle"),
                }
                self.update_health(true).await;
                return CycleSummary {
                    skipped: true,
                    ..CycleSummary::default()
                };
            }
        };

        match self.sentiment_source.fetch_sentiment().await {
            Ok(reading) => self.sentiment = Some(reading),
            Err(err) => {
                self.record_upstream_error();
                warn!(error = %err, "Sentiment fetch failed, keeping previous reading");
            }
        }

        let mut summary = CycleSummary::default();
        let coins = self.config.coins.clone();
        for coin in &coins {
            match quotes.get(&coin.symbol) {
                Some(quote) => {
                    if self.evaluate_coin(&coin.symbol, quote, now) {
                        summary.evaluated += 1;
                    } else {
                        summary.rejected += 1;
                    }
                }
                None => summary.missing += 1,
            }
        }

        self.publish(now).await;
        self.update_health(false).await;
        if let Some(metrics) = &self.metrics {
            metrics.refresh_cycles_total.inc();
        }
        summary
    }

    /// Run the engine on the history extended by `quote`. The point is only
    /// committed when the engine accepts the window; a rejected cycle keeps
    /// the coin's previous result.
    fn evaluate_coin(&mut self, symbol: &str, quote: &Quote, now: DateTime<Utc>) -> bool {
        let limit = self.config.history_limit;
        let history = self
            .histories
            .entry(symbol.to_string())
            .or_insert_with(|| PriceHistory::new(limit));

        let mut point = PricePoint::new(now, quote.price);
        if let Some(volume) = quote.volume {
            point = point.with_volume(volume);
        }
        let window = history.candidate(point);

        let started = Instant::now();
        let result = self.engine.evaluate_points(window.clone(), self.sentiment.as_ref());
        if let Some(metrics) = &self.metrics {
            metrics
                .engine_duration_seconds
                .observe(started.elapsed().as_secs_f64());
        }

        match result {
            Ok(signal) => {
                history.commit(window);
                let chart = chart_data(history, &self.engine, self.config.chart_points);
                self.latest.insert(
                    symbol.to_string(),
                    CoinSnapshot {
                        coin: symbol.to_string(),
                        price: quote.price,
                        change_24h: quote.change_24h,
                        signal,
                        chart,
                        updated_at: now,
                    },
                );
                if let Some(metrics) = &self.metrics {
                    metrics.signals_evaluated_total.inc();
                }
                true
            }
            Err(err) => {
                warn!(coin = symbol, error = %err, "Rejected cycle input, keeping previous result");
                if let Some(metrics) = &self.metrics {
                    metrics.rejected_inputs_total.inc();
                }
                false
            }
        }
    }

    async fn publish(&self, now: DateTime<Utc>) {
        let dashboard = self
            .config
            .coins
            .iter()
            .filter_map(|coin| self.latest.get(&coin.symbol).cloned())
            .collect();

        let mut snapshot = self.snapshot.write().await;
        *snapshot = DashboardSnapshot {
            dashboard,
            fear_greed: self.sentiment.clone(),
            timestamp: Some(now),
        };
    }

    async fn update_health(&self, skipped: bool) {
        let mut health = self.health.write().await;
        if !skipped {
            if health.consecutive_skips >= DEGRADED_AFTER_SKIPS {
                info!("Price feed recovered, reporting healthy");
            }
            *health = HealthStatus::default();
            return;
        }
        health.consecutive_skips += 1;
        if health.consecutive_skips == DEGRADED_AFTER_SKIPS {
            warn!(
                skips = health.consecutive_skips,
                "Price feed keeps failing, reporting degraded"
            );
            health.status = "degraded".to_string();
        }
    }

    fn record_upstream_error(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.upstream_errors_total.inc();
        }
    }
}

fn chart_data(history: &PriceHistory, engine: &SignalEngine, points: usize) -> ChartData {
    let prices = history.prices(points);
    let params = &engine.config().indicators;
    ChartData {
        ema_fast: ema_series(&prices, params.ema_fast),
        ema_slow: ema_series(&prices, params.ema_slow),
        prices,
    }
}
