// =============================================================================
// Emotion Dashboard: Main Entry Point
// =============================================================================
//
// Serves synthetic price / emotion datasets and their indicator overlays to
// the browser dashboard. Every request generates a fresh dataset; nothing is
// persisted between requests.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analytics;
mod api;
mod app_state;
mod chart;
mod generator;
mod indicators;
mod runtime_config;
mod time_range;
mod types;
mod view_model;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::DashboardConfig;

const DEFAULT_CONFIG_PATH: &str = "dashboard_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Emotion Dashboard starting up");

    let config_path =
        std::env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = DashboardConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "Failed to load config, using defaults");
        let defaults = DashboardConfig::default();
        if !std::path::Path::new(&config_path).exists() {
            // Leave an editable template behind for the next start.
            if let Err(e) = defaults.save(&config_path) {
                warn!(error = %e, "Failed to write default config");
            }
        }
        defaults
    });
    config.apply_env(|key| std::env::var(key).ok());

    info!(
        companies = config.companies.len(),
        default_range = %config.default_range,
        fixed_seed = ?config.fixed_seed,
        origins = ?config.allowed_origins,
        "Configuration ready"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    // ── 3. Start the API server ──────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    // ── 4. Shutdown ──────────────────────────────────────────────────────
    info!(
        requests_served = state.requests_served(),
        uptime_secs = state.uptime_secs(),
        "Emotion Dashboard shut down complete."
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received: stopping gracefully");
}
