//! Probe outcome classification

use serde::Serialize;
use std::error::Error as StdError;

/// Message recorded for a 2xx response
pub const AVAILABLE_MESSAGE: &str = "available";

/// Result of a single availability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub available: bool,
    pub message: String,
    /// HTTP status, absent when no response arrived
    pub status_code: Option<u16>,
}

impl ProbeOutcome {
    /// Classify a received HTTP status
    pub fn from_status(code: u16) -> Self {
        if (200..300).contains(&code) {
            Self {
                available: true,
                message: AVAILABLE_MESSAGE.to_string(),
                status_code: Some(code),
            }
        } else {
            Self {
                available: false,
                message: format!("server responded with status {}", code),
                status_code: Some(code),
            }
        }
    }

    /// Classify a failure that produced no response
    pub fn unreachable(error: &(dyn StdError + 'static)) -> Self {
        Self {
            available: false,
            message: format!("failed to connect: {}", describe(error)),
            status_code: None,
        }
    }
}

/// Flatten an error and its sources into one line
fn describe(error: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}
