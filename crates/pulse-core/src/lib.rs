//! Pulse Core Business Logic
//!
//! This crate provides the cache-aside layer shared by every service, the
//! server service, and the status service that probes URLs and records
//! their availability.

pub mod cache;
pub mod config;
pub mod error;
pub mod server;
pub mod status;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheEntity, CacheExecutor, CacheStore, CacheValue, OperationCounter};
pub use config::{DEFAULT_SERVER_ID, StatusConfig};
pub use error::CoreError;
pub use server::ServerService;
pub use status::{StatusInput, StatusService};
