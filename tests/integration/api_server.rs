//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks and metrics.

use std::sync::Arc;

use cryptobit::core::runtime::{ChartData, CoinSnapshot, DashboardSnapshot};
use cryptobit::models::sentiment::SentimentReading;
use cryptobit::models::signal::SignalResult;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::test_utils::{base_time, TestApi};

fn populated() -> TestApi {
    let snapshot = DashboardSnapshot {
        dashboard: vec![CoinSnapshot {
            coin: "BTC".to_string(),
            price: 43_250.5,
            change_24h: -1.2,
            signal: SignalResult::insufficient_data(Vec::new()),
            chart: ChartData {
                prices: vec![43_200.0, 43_250.5],
                ema_fast: vec![None, None],
                ema_slow: vec![None, None],
            },
            updated_at: base_time(),
        }],
        fear_greed: Some(SentimentReading::from_value(18)),
        timestamp: Some(base_time()),
    };
    TestApi::new(Arc::new(RwLock::new(snapshot)))
}

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = populated();
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "cryptobit-signal-engine");
    assert!(body["last_refresh"].is_string());
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = populated();
    app.server.get("/health").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_requests_in_flight",
        "refresh_cycles_total",
        "rejected_inputs_total",
    ] {
        assert!(body.contains(name), "Expected {name} metric");
    }
    assert!(app.metrics.http_requests_total.get() >= 1);
}

#[tokio::test]
async fn dashboard_endpoint_returns_snapshot() {
    let app = populated();
    let response = app.server.get("/api/data").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["dashboard"][0]["coin"], "BTC");
    assert_eq!(body["dashboard"][0]["signal"]["direction"], "neutral");
    assert_eq!(body["dashboard"][0]["signal"]["reasons"][0], "insufficient data");
    assert_eq!(body["dashboard"][0]["chart"]["prices"][1], 43_250.5);
    assert_eq!(body["fear_greed"]["value"], 18);
    assert_eq!(body["fear_greed"]["classification"], "Extreme Fear");
}

#[tokio::test]
async fn dashboard_endpoint_before_first_refresh() {
    let app = TestApi::new(Arc::new(RwLock::new(DashboardSnapshot::default())));
    let body: Value = app.server.get("/api/data").await.json();

    assert_eq!(body["dashboard"].as_array().map(Vec::len), Some(0));
    assert!(body["fear_greed"].is_null());
    assert!(body["timestamp"].is_null());
}

#[tokio::test]
async fn coin_signal_lookup_is_case_insensitive() {
    let app = populated();
    let response = app.server.get("/api/signals/btc").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["coin"], "BTC");
    assert_eq!(body["signal"]["label"], "NEUTRAL");
}

#[tokio::test]
async fn unknown_coin_is_not_found() {
    let app = populated();
    let response = app.server.get("/api/signals/DOGE").await;
    assert_eq!(response.status_code(), 404);
}
