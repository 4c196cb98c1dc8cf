//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::core::runtime::{CoinSnapshot, DashboardSnapshot, SharedHealth, SharedSnapshot};
use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub health: SharedHealth,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub snapshot: SharedSnapshot,
}

impl AppState {
    pub fn new(metrics: Arc<Metrics>, snapshot: SharedSnapshot, health: SharedHealth) -> Self {
        Self {
            health,
            metrics,
            start_time: Arc::new(Instant::now()),
            snapshot,
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let last_refresh = state.snapshot.read().await.timestamp;
    Ok(Json(json!({
        "status": health.status,
        "consecutive_skips": health.consecutive_skips,
        "uptime_seconds": uptime_seconds,
        "last_refresh": last_refresh,
        "service": "cryptobit-signal-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Latest dashboard: one entry per coin plus the shared sentiment reading.
pub async fn dashboard_data(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.snapshot.read().await.clone())
}

pub async fn coin_signal(
    State(state): State<AppState>,
    Path(coin): Path<String>,
) -> Result<Json<CoinSnapshot>, StatusCode> {
    let snapshot = state.snapshot.read().await;
    snapshot
        .dashboard
        .iter()
        .find(|entry| entry.coin.eq_ignore_ascii_case(&coin))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Tracks request counts, latency and in-flight requests.
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/data", get(dashboard_data))
        .route("/api/signals/{coin}", get(coin_signal))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Dashboard data available at http://0.0.0.0:{}/api/data",
        port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
