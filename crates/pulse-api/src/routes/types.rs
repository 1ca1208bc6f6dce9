//! Request/Response DTOs

use pulse_core::StatusInput;
use pulse_db::{Server, ServerStatus};
use serde::{Deserialize, Serialize};

// ==================== Server Types ====================

/// Create or update server request
#[derive(Deserialize)]
pub struct ServerRequest {
    #[serde(default)]
    pub name: String,
}

/// Server response
#[derive(Serialize)]
pub struct ServerResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Server> for ServerResponse {
    fn from(server: Server) -> Self {
        Self {
            id: server.id,
            name: server.name,
            created_at: server.created_at.to_rfc3339(),
            updated_at: server.updated_at.to_rfc3339(),
        }
    }
}

// ==================== Status Types ====================

/// Create or update status request
#[derive(Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub server_id: Option<i64>,
}

impl From<StatusRequest> for StatusInput {
    fn from(request: StatusRequest) -> Self {
        Self {
            url: request.url,
            is_available: request.is_available,
            message: request.message,
            server_id: request.server_id,
        }
    }
}

/// Status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub id: i64,
    pub url: String,
    pub is_available: bool,
    pub message: String,
    pub server_id: i64,
    pub checked_at: String,
}

impl From<ServerStatus> for StatusResponse {
    fn from(status: ServerStatus) -> Self {
        Self {
            id: status.id,
            url: status.url,
            is_available: status.is_available,
            message: status.message,
            server_id: status.server_id,
            checked_at: status.checked_at.to_rfc3339(),
        }
    }
}

/// One entry of a bulk check request
#[derive(Deserialize)]
pub struct BulkCheckItem {
    #[serde(default)]
    pub url: String,
}

/// Query for a single check
#[derive(Deserialize)]
pub struct CheckQuery {
    pub url: Option<String>,
}

/// Query for statuses grouped by server name
#[derive(Deserialize)]
pub struct ServerNameQuery {
    #[serde(rename = "serverName")]
    pub server_name: Option<String>,
}

// ==================== Cache Types ====================

/// Cache operation count response
#[derive(Serialize)]
pub struct RequestCountResponse {
    pub count: u64,
}

/// Cache clear response
#[derive(Serialize)]
pub struct CacheClearedResponse {
    pub cleared: usize,
}
