//! REST API over a completed simulation run.
//!
//! Provides three GET endpoints:
//! - `/healthz`: liveness probe
//! - `/state`: run summary and stored row count
//! - `/readings`: stored readings with optional range/channel filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::runner::RunReport;
use crate::sim::types::Reading;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the run completes and wrapped in `Arc`; no
/// locks needed since all data is read-only.
pub struct AppState {
    /// Building the run generated for.
    pub building_id: String,
    /// Summary of the completed run.
    pub report: RunReport,
    /// Stored readings in chronological order.
    pub readings: Vec<Reading>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::get_health))
        .route("/state", get(handlers::get_state))
        .route("/readings", get(handlers::get_readings))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
