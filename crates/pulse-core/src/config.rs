//! Core service configuration

/// Id the fallback server is looked up by before falling back to its name
pub const DEFAULT_SERVER_ID: i64 = 1;

/// Configuration for the status service
#[derive(Debug, Clone)]
pub struct StatusConfig {
    /// Upper bound on probes in flight during a bulk check
    pub max_concurrency: usize,
    /// Name given to the lazily created fallback server
    pub default_server_name: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            default_server_name: "Default Server".to_string(),
        }
    }
}
