//! Server status routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{
    BulkCheckItem, CheckQuery, RequestCountResponse, ServerNameQuery, StatusRequest,
    StatusResponse,
};

// ==================== Probe Routes ====================

/// GET /api/server-status/check?url=
async fn check_status(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let url = query
        .url
        .ok_or_else(|| ApiError::BadRequest("url query parameter is required".to_string()))?;

    let status = state.statuses.check_status(&url).await?;
    Ok(Json(status.into()))
}

/// POST /api/server-status/bulk
async fn check_statuses(
    State(state): State<AppState>,
    Json(items): Json<Vec<BulkCheckItem>>,
) -> Result<Json<Vec<StatusResponse>>, ApiError> {
    debug!("Bulk check of {} urls", items.len());

    let urls: Vec<String> = items.into_iter().map(|item| item.url).collect();
    let statuses = state.statuses.check_statuses(&urls).await?;
    Ok(Json(statuses.into_iter().map(Into::into).collect()))
}

// ==================== Status CRUD Routes ====================

/// POST /api/server-status
async fn create_status(
    State(state): State<AppState>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = state.statuses.create_status(request.into()).await?;
    Ok(Json(status.into()))
}

/// GET /api/server-status
async fn list_statuses(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusResponse>>, ApiError> {
    let statuses = state.statuses.list_statuses().await?;
    Ok(Json(statuses.into_iter().map(Into::into).collect()))
}

/// GET /api/server-status/{id}
async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = state.statuses.get_status(id).await?;
    Ok(Json(status.into()))
}

/// PUT /api/server-status/{id}
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = state.statuses.update_status(id, request.into()).await?;
    Ok(Json(status.into()))
}

/// DELETE /api/server-status/{id}
async fn delete_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.statuses.delete_status(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/server-status/statuses-by-server?serverName=
async fn statuses_by_server(
    State(state): State<AppState>,
    Query(query): Query<ServerNameQuery>,
) -> Result<Json<Vec<StatusResponse>>, ApiError> {
    let name = query.server_name.ok_or_else(|| {
        ApiError::BadRequest("serverName query parameter is required".to_string())
    })?;

    let statuses = state.statuses.list_statuses_by_server_name(&name).await?;
    Ok(Json(statuses.into_iter().map(Into::into).collect()))
}

// ==================== Counter Routes ====================

/// GET /api/server-status/request-count
async fn request_count(State(state): State<AppState>) -> Json<RequestCountResponse> {
    Json(RequestCountResponse {
        count: state.cache.operation_count(),
    })
}

/// POST /api/server-status/request-count/reset
async fn reset_request_count(State(state): State<AppState>) -> StatusCode {
    info!("Resetting cache operation count");
    state.cache.reset_operation_count();
    StatusCode::NO_CONTENT
}

/// Create server status routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/server-status", get(list_statuses).post(create_status))
        .route("/api/server-status/check", get(check_status))
        .route("/api/server-status/bulk", post(check_statuses))
        .route("/api/server-status/statuses-by-server", get(statuses_by_server))
        .route("/api/server-status/request-count", get(request_count))
        .route(
            "/api/server-status/request-count/reset",
            post(reset_request_count),
        )
        .route(
            "/api/server-status/{id}",
            get(get_status).put(update_status).delete(delete_status),
        )
}
