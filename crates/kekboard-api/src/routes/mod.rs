//! Route definitions

use axum::{routing::get, Router};

use crate::handlers::{health, stats};
use crate::state::AppState;

/// Create the main router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::get_stats))
        .merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
