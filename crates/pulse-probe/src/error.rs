//! Probe error types
//!
//! Only client construction can fail. Failed probes are reported as
//! unavailable outcomes, never as errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
