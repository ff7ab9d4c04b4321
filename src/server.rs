//! HTTP server implementation using Axum

use crate::cache::ManifestCache;
use crate::clock::Clock;
use crate::handler::{
    handle_health, handle_index, handle_snapshot, handle_version, handle_version_api,
};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across handlers
pub struct AppState {
    /// Cached version manifest
    pub cache: Arc<ManifestCache>,
    /// Clock used to compute ages; the same one drives cache freshness
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(cache: Arc<ManifestCache>, clock: Arc<dyn Clock>) -> Self {
        Self { cache, clock }
    }
}

/// Builds the router with every route wired to `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/snapshot", get(handle_snapshot))
        .route("/api/versions/:version", get(handle_version_api))
        .route("/:version", get(handle_version))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
///
/// Returns the actual address the server is bound to (useful when port=0)
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<SocketAddr> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
