//! Cache management routes

use axum::{Json, Router, extract::State, routing::delete};
use tracing::info;

use crate::state::AppState;

use super::types::CacheClearedResponse;

/// DELETE /api/cache
async fn clear_cache(State(state): State<AppState>) -> Json<CacheClearedResponse> {
    let cleared = state.cache.store().len();
    state.cache.clear();

    info!("Cleared {} cache entries", cleared);
    Json(CacheClearedResponse { cleared })
}

/// Create cache routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/cache", delete(clear_cache))
}
