//! HTTP adapters - REST API implementations.
//!
//! - `progression` - Progress, navigation, completion and certificate endpoints
//! - `middleware` - Request extractors shared by all endpoints

pub mod middleware;
pub mod progression;

pub use progression::{progression_router, ProgressionAppState};

use axum::{routing::get, Router};

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

/// Router with the health probe, mergeable into the application router.
pub fn health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
