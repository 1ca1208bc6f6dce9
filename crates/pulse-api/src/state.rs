//! Application state

use pulse_core::{CacheExecutor, ServerService, StatusService};
use std::sync::Arc;

/// Prometheus handle rendered by the metrics endpoint
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub servers: Arc<ServerService>,
    pub statuses: Arc<StatusService>,
    pub cache: CacheExecutor,
}

impl AppState {
    pub fn new(
        servers: Arc<ServerService>,
        statuses: Arc<StatusService>,
        cache: CacheExecutor,
    ) -> Self {
        Self {
            servers,
            statuses,
            cache,
        }
    }
}
