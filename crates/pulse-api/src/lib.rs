//! Pulse REST API
//!
//! This crate provides the Axum-based HTTP API for Pulse: request
//! validation, routing to the core services, and the mapping of core
//! errors onto HTTP responses.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
