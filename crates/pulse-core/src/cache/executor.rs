//! Cache-aside executor
//!
//! Wraps storage access in the read-through and write-invalidate patterns
//! shared by every service. Each call counts as exactly one operation,
//! hit or miss, success or failure. Errors from the wrapped closure are
//! returned untouched and leave the cache as it was.

use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::counter::OperationCounter;
use super::store::CacheStore;
use super::value::CacheEntity;

#[derive(Clone, Default)]
pub struct CacheExecutor {
    store: Arc<CacheStore>,
    counter: Arc<OperationCounter>,
}

impl CacheExecutor {
    pub fn new(store: Arc<CacheStore>, counter: Arc<OperationCounter>) -> Self {
        Self { store, counter }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn counter(&self) -> &OperationCounter {
        &self.counter
    }

    /// Count one operation that consults the store directly
    pub fn record_operation(&self) {
        self.counter.increment();
    }

    /// Return the cached value for `key`, or load, store and return it
    pub async fn read_one_or_load<T, E, F, Fut>(&self, key: &str, loader: F) -> Result<T, E>
    where
        T: CacheEntity,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.counter.increment();

        if let Some(cached) = self.store.get::<T>(key) {
            debug!("Cache hit for key: {}", key);
            metrics::counter!("pulse_cache_hits_total").increment(1);
            return Ok(cached);
        }
        metrics::counter!("pulse_cache_misses_total").increment(1);

        let value = loader().await?;
        self.store.put(key, value.clone());
        Ok(value)
    }

    /// Sequence variant of [`CacheExecutor::read_one_or_load`]
    pub async fn read_many_or_load<T, E, F, Fut>(&self, key: &str, loader: F) -> Result<Vec<T>, E>
    where
        T: CacheEntity,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        self.counter.increment();

        if let Some(cached) = self.store.get_many::<T>(key) {
            debug!("Cache hit for key: {}", key);
            metrics::counter!("pulse_cache_hits_total").increment(1);
            return Ok(cached);
        }
        metrics::counter!("pulse_cache_misses_total").increment(1);

        let values = loader().await?;
        self.store.put_many(key, values.clone());
        Ok(values)
    }

    /// Run a mutating `writer` and store its result under the key derived from it
    ///
    /// Unlike [`CacheExecutor::read_one_or_load`] an existing entry never
    /// short-circuits the write.
    pub async fn write_through<T, E, F, Fut, K>(&self, writer: F, key_of: K) -> Result<T, E>
    where
        T: CacheEntity,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        K: FnOnce(&T) -> String,
    {
        self.counter.increment();

        let value = writer().await?;
        let key = key_of(&value);
        debug!("Storing written value under key: {}", key);
        self.store.put(&key, value.clone());
        Ok(value)
    }

    /// Run a destructive `writer`, then drop every entry matching `prefix`
    pub async fn invalidate_after_write<R, E, F, Fut>(&self, prefix: &str, writer: F) -> Result<R, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        self.counter.increment();

        if self.store.get_by_key(prefix).is_some() {
            debug!("Cache entry present for key: {}", prefix);
        }

        let result = writer().await?;
        self.store.invalidate_prefix(prefix);
        Ok(result)
    }

    pub fn operation_count(&self) -> u64 {
        self.counter.get()
    }

    pub fn reset_operation_count(&self) {
        self.counter.reset();
    }

    pub fn clear(&self) {
        self.store.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys;
    use crate::testing::{server, status};
    use pulse_db::{Server, ServerStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_second_read_skips_loader() {
        let executor = CacheExecutor::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let loaded: Result<Server, String> = executor
                .read_one_or_load("server_1", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(server(1, "web"))
                })
                .await;
            assert_eq!(loaded.unwrap().name, "web");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(executor.operation_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_loader_is_not_cached() {
        let executor = CacheExecutor::default();

        let failed: Result<Server, String> = executor
            .read_one_or_load("server_9", || async { Err("boom".to_string()) })
            .await;
        assert_eq!(failed.unwrap_err(), "boom");
        assert!(executor.store().is_empty());
        assert_eq!(executor.operation_count(), 1);

        let loaded: Result<Server, String> = executor
            .read_one_or_load("server_9", || async { Ok(server(9, "late")) })
            .await;
        assert_eq!(loaded.unwrap().name, "late");
    }

    #[tokio::test]
    async fn test_read_many_caches_sequence() {
        let executor = CacheExecutor::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let loaded: Result<Vec<ServerStatus>, String> = executor
                .read_many_or_load(keys::ALL_STATUSES, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![status(1, "http://a.example", 1), status(2, "http://b.example", 1)])
                })
                .await;
            assert_eq!(loaded.unwrap().len(), 2);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_write_through_overwrites_existing_entry() {
        let executor = CacheExecutor::default();
        executor.store().put_server(&server(1, "old"));

        let written: Result<Server, String> = executor
            .write_through(|| async { Ok(server(1, "new")) }, |s| keys::server_key(s.id))
            .await;

        assert_eq!(written.unwrap().name, "new");
        assert_eq!(executor.store().get_server(1).unwrap().name, "new");
        assert_eq!(executor.operation_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_after_write() {
        let executor = CacheExecutor::default();
        executor.store().put_status(&status(3, "http://a.example", 1));
        executor.store().put_status(&status(4, "http://b.example", 1));

        let deleted: Result<bool, String> = executor
            .invalidate_after_write("status_3", || async { Ok(true) })
            .await;

        assert!(deleted.unwrap());
        assert!(executor.store().get_status(3).is_none());
        assert!(executor.store().get_status(4).is_some());
    }

    #[tokio::test]
    async fn test_failed_writer_leaves_cache() {
        let executor = CacheExecutor::default();
        executor.store().put_status(&status(3, "http://a.example", 1));

        let result: Result<(), String> = executor
            .invalidate_after_write("status_3", || async { Err("db down".to_string()) })
            .await;

        assert!(result.is_err());
        assert!(executor.store().get_status(3).is_some());
        assert_eq!(executor.operation_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls_count_exactly_once() {
        let executor = CacheExecutor::default();
        let mut tasks = Vec::new();

        for i in 0..50 {
            let executor = executor.clone();
            tasks.push(tokio::spawn(async move {
                for j in 0..20 {
                    let id = (i * 20 + j) % 7;
                    let _: Result<Server, String> = if j % 5 == 0 {
                        executor
                            .read_one_or_load("server_fail", || async { Err("nope".to_string()) })
                            .await
                    } else {
                        executor
                            .read_one_or_load(&keys::server_key(id), || async move {
                                Ok(server(id, "concurrent"))
                            })
                            .await
                    };
                }
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(executor.operation_count(), 1000);

        executor.reset_operation_count();
        assert_eq!(executor.operation_count(), 0);
    }
}
