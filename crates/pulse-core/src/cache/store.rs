//! In-process cache store

use dashmap::DashMap;
use pulse_db::{Server, ServerStatus};
use tracing::{debug, info, warn};

use super::keys;
use super::value::{CacheEntity, CacheValue};

/// Concurrent keyed store of typed values
///
/// Entries never expire; they live until a prefix invalidation or a full
/// clear removes them.
#[derive(Default)]
pub struct CacheStore {
    entries: DashMap<String, CacheValue>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw entry for `key`
    pub fn get_by_key(&self, key: &str) -> Option<CacheValue> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Single typed value; a stored value of another shape reads as absent
    pub fn get<T: CacheEntity>(&self, key: &str) -> Option<T> {
        let entry = self.entries.get(key)?;
        let value = T::from_value(entry.value());
        if value.is_none() {
            warn!("Cache entry {} holds {}, ignoring", key, entry.value().kind());
        }
        value
    }

    /// Sequence of typed values; same contract as [`CacheStore::get`]
    pub fn get_many<T: CacheEntity>(&self, key: &str) -> Option<Vec<T>> {
        let entry = self.entries.get(key)?;
        let values = T::many_from_value(entry.value());
        if values.is_none() {
            warn!("Cache entry {} holds {}, ignoring", key, entry.value().kind());
        }
        values
    }

    pub fn put<T: CacheEntity>(&self, key: &str, value: T) {
        self.entries.insert(key.to_string(), value.into_value());
    }

    pub fn put_many<T: CacheEntity>(&self, key: &str, values: Vec<T>) {
        self.entries.insert(key.to_string(), T::many_into_value(values));
    }

    /// Remove every key equal to or starting with `prefix`
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut removed = 0;
        self.entries.retain(|key, _| {
            let matches = key.starts_with(prefix);
            if matches {
                removed += 1;
            }
            !matches
        });
        if removed > 0 {
            debug!("Invalidated {} cache entries with prefix {}", removed, prefix);
        }
        removed
    }

    pub fn clear_all(&self) {
        let count = self.entries.len();
        self.entries.clear();
        info!("Cleared {} cache entries", count);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ==================== Entity Helpers ====================

    pub fn get_server(&self, id: i64) -> Option<Server> {
        self.get(&keys::server_key(id))
    }

    pub fn put_server(&self, server: &Server) {
        self.put(&keys::server_key(server.id), server.clone());
    }

    pub fn get_status(&self, id: i64) -> Option<ServerStatus> {
        self.get(&keys::status_key(id))
    }

    pub fn put_status(&self, status: &ServerStatus) {
        self.put(&keys::status_key(status.id), status.clone());
    }

    pub fn put_all_servers(&self, servers: Vec<Server>) {
        self.put_many(keys::ALL_SERVERS, servers);
    }

    pub fn put_all_statuses(&self, statuses: Vec<ServerStatus>) {
        self.put_many(keys::ALL_STATUSES, statuses);
    }

    pub fn put_statuses_by_server_name(&self, name: &str, statuses: Vec<ServerStatus>) {
        self.put_many(&keys::statuses_by_server_key(name), statuses);
    }

    /// Drop every per-id server entry and the server collection
    pub fn clear_server_cache(&self) {
        self.invalidate_prefix(keys::SERVER_PREFIX);
        self.invalidate_prefix(keys::ALL_SERVERS);
    }

    /// Drop every status entry, grouping, collection and probe result
    pub fn clear_status_cache(&self) {
        self.invalidate_prefix(keys::STATUS_PREFIX);
        self.invalidate_prefix(keys::STATUSES_BY_SERVER_PREFIX);
        self.invalidate_prefix(keys::ALL_STATUSES);
        self.invalidate_prefix(keys::PROBE_PREFIX);
    }
}
