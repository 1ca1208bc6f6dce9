//! Pulse Database Layer
//!
//! This crate provides the persistence layer for Pulse: the server and
//! status models, the repository traits the core consumes, and their
//! SQLite implementation via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
pub use store::{ServerRepository, StatusRepository};
