//! URL fingerprints for probe deduplication

use sha2::{Digest, Sha256};
use url::Url;

/// Canonical text of a URL
///
/// Parsing lowercases the scheme and host and drops default ports; input
/// that does not parse is only trimmed.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// SHA-256 hex digest of the normalized URL
pub fn fingerprint(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_url(url).as_bytes());
    hex::encode(hasher.finalize())
}
