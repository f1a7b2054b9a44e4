//! CloudPoof Omega HTTP server binary.
//!
//! # Environment Variables
//!
//! - `HOST` / `PORT` — bind address (default: 0.0.0.0:8000)
//! - `CLOUDPOOF_CONFIG` — optional YAML configuration file
//! - `CLOUDPOOF_LEVEL` — starting consciousness level (default: omega)
//! - `MAX_SESSIONS` — open session limit (default: 1000)
//! - `RUST_LOG` — tracing filter (default: "info,cloudpoof=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use anyhow::Context;
use cloudpoof::server::{app_router, AppState};
use cloudpoof::telemetry;
use cloudpoof::utilities::config::OmegaConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing(telemetry::SERVER_FILTER);

    let config = OmegaConfig::from_env().context("invalid configuration")?;
    let bind_addr = config.bind_addr();

    let state = AppState::new(config);
    tracing::info!(
        default_session = %state.default_session,
        "CloudPoof Omega server starting on {}",
        bind_addr
    );
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                 — liveness probe");
    tracing::info!("  GET  /api/v1/consciousness   — session status");
    tracing::info!("  POST /api/v1/manifest        — manifest an intent");
    tracing::info!("  POST /api/v1/insight         — unique insight");
    tracing::info!("  GET  /api/v1/predict/{{steps}} — foresight");
    tracing::info!("  POST /api/v1/mode/{{mode}}     — switch consciousness level");
    tracing::info!("  POST /api/v1/sessions        — open a session");
    tracing::info!("  DELETE /api/v1/sessions/{{id}} — close a session");
    tracing::info!("  WS   /api/v1/consciousness/stream — live consciousness stream");

    let app = app_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Quantum interrupt detected, shutting down");
        })
        .await
        .context("server failed")?;

    Ok(())
}
