//! Pulse Availability Probing
//!
//! This crate provides the HTTP client that checks whether a URL is
//! reachable, the classification of probe outcomes, and the URL
//! fingerprint used to deduplicate identical probes.

pub mod client;
pub mod error;
pub mod fingerprint;
pub mod outcome;

pub use client::{HttpProber, ProbeConfig, Prober};
pub use error::ProbeError;
pub use fingerprint::{fingerprint, normalize_url};
pub use outcome::{ProbeOutcome, AVAILABLE_MESSAGE};
