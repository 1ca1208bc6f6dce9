//! API routes

mod cache;
mod health;
pub mod metrics;
mod servers;
mod statuses;
pub mod types;

use axum::Router;
use std::sync::Arc;

use crate::state::{AppState, MetricsHandle};

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let router = Router::new()
        // Health check
        .merge(health::routes())
        // Server and status API
        .merge(servers::routes())
        .merge(statuses::routes())
        // Cache management
        .merge(cache::routes())
        .with_state(state);

    match metrics_handle {
        Some(handle) => router.merge(metrics::routes(handle)),
        None => router,
    }
}
