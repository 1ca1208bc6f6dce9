//! Server routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{ServerRequest, ServerResponse};

/// POST /api/servers
async fn create_server(
    State(state): State<AppState>,
    Json(request): Json<ServerRequest>,
) -> Result<Json<ServerResponse>, ApiError> {
    debug!("Creating server: {}", request.name);

    let server = state.servers.create_server(&request.name).await?;
    Ok(Json(server.into()))
}

/// GET /api/servers
async fn list_servers(State(state): State<AppState>) -> Result<Json<Vec<ServerResponse>>, ApiError> {
    let servers = state.servers.list_servers().await?;
    Ok(Json(servers.into_iter().map(Into::into).collect()))
}

/// GET /api/servers/{id}
async fn get_server(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ServerResponse>, ApiError> {
    let server = state.servers.get_server(id).await?;
    Ok(Json(server.into()))
}

/// PUT /api/servers/{id}
async fn update_server(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ServerRequest>,
) -> Result<Json<ServerResponse>, ApiError> {
    let server = state.servers.update_server(id, &request.name).await?;
    Ok(Json(server.into()))
}

/// DELETE /api/servers/{id}
async fn delete_server(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.servers.delete_server(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create server routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/servers", get(list_servers).post(create_server))
        .route(
            "/api/servers/{id}",
            get(get_server).put(update_server).delete(delete_server),
        )
}
