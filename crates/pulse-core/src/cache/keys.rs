//! Cache key layout
//!
//! Keys are namespaced by entity type and lookup mode. Prefix invalidation
//! relies on no family prefix being a prefix of another family's keys.

use pulse_probe::fingerprint;

pub const ALL_SERVERS: &str = "all_servers";
pub const ALL_STATUSES: &str = "all_statuses";
pub const SERVER_PREFIX: &str = "server_";
pub const STATUS_PREFIX: &str = "status_";
pub const STATUSES_BY_SERVER_PREFIX: &str = "statuses_by_server_";
pub const PROBE_PREFIX: &str = "probe_";

pub fn server_key(id: i64) -> String {
    format!("{}{}", SERVER_PREFIX, id)
}

pub fn status_key(id: i64) -> String {
    format!("{}{}", STATUS_PREFIX, id)
}

pub fn statuses_by_server_key(name: &str) -> String {
    format!("{}{}", STATUSES_BY_SERVER_PREFIX, name)
}

/// Deduplication key for a probe of `url`
pub fn probe_key(url: &str) -> String {
    format!("{}{}", PROBE_PREFIX, fingerprint(url))
}
