//! HTTP front end for a walkability session.

pub mod api;
pub mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use walkability_core::Walkability;

pub use api::{AppState, create_router};
pub use config::{HttpConfig, ServerConfig};

/// Serves the API until Ctrl+C is received.
///
/// # Errors
///
/// Fails when the listener cannot be bound or the server stops abnormally.
pub async fn run_server(session: Arc<Walkability>, http: HttpConfig) -> anyhow::Result<()> {
    let app = create_router(AppState::new(session), &http);

    let listener = TcpListener::bind(http.bind)
        .await
        .with_context(|| format!("Failed to bind {}", http.bind))?;
    info!("Listening on http://{}", http.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
