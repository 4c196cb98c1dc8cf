//! Cryptobit Signal Engine Server
//!
//! Runs the refresh loop against CoinGecko and the Fear & Greed index and
//! serves the latest dashboard over HTTP.

use std::sync::Arc;

use cryptobit::config::{get_environment, EngineConfig, ServiceConfig};
use cryptobit::core::http::{start_server, AppState};
use cryptobit::core::runtime::{RuntimeConfig, SignalRuntime};
use cryptobit::logging::init_logging;
use cryptobit::metrics::Metrics;
use cryptobit::services::{CoinGeckoClient, FearGreedClient};
use cryptobit::SignalEngine;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging();

    let service_config = ServiceConfig::from_env()?;
    let engine_config = EngineConfig::from_env()?;
    let engine = SignalEngine::new(engine_config).map_err(|e| {
        error!(error = %e, "Invalid engine configuration");
        e
    })?;

    info!(
        environment = %get_environment(),
        port = service_config.port,
        coins = service_config.coins.len(),
        refresh_secs = service_config.refresh_interval_seconds,
        "Starting Cryptobit Signal Engine Server"
    );

    let metrics = Arc::new(Metrics::new()?);
    let feed = Arc::new(CoinGeckoClient::new(service_config.coingecko_url.clone()));
    let sentiment = Arc::new(FearGreedClient::new(service_config.fear_greed_url.clone()));

    let runtime = SignalRuntime::new(
        RuntimeConfig::from(&service_config),
        engine,
        feed,
        sentiment,
    )
    .with_metrics(metrics.clone());
    let state = AppState::new(metrics, runtime.snapshot(), runtime.health());

    let port = service_config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });
    let runtime_handle = tokio::spawn(runtime.run());

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
        _ = runtime_handle => {
            error!("Signal runtime stopped");
        }
    }

    Ok(())
}
