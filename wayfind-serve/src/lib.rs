//! HTTP server for indoor wayfinding and map editing
//!
//! Serves route queries over a shared [`wayfind_graph::Graph`] and exposes
//! the editor operations that change it.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use anyhow::{Context, Result};
use std::sync::Arc;
use wayfind_graph::Graph;

pub use api::build_router;
pub use config::ServeConfig;
pub use error::ApiError;
pub use state::AppState;

/// Load the map and serve until Ctrl-C
pub async fn serve(config: ServeConfig) -> Result<()> {
    let state = match &config.map_path {
        Some(path) => AppState::load(path)
            .with_context(|| format!("Failed to load map document {}", path.display()))?,
        None => {
            tracing::warn!("no map document configured; starting with an empty map");
            AppState::new(Graph::new(), None)
        }
    };

    let app = build_router(Arc::new(state));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "server listening");
    tracing::info!("swagger UI at http://{addr}/swagger-ui/");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
