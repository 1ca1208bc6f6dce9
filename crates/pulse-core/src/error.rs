//! Core error types
//!
//! Probe failures are not errors; they become unavailable status records.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] pulse_db::DbError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Batch insert returned {actual} records for {expected} inputs")]
    BatchMismatch { expected: usize, actual: usize },
}
