//! Status service: availability probing and status CRUD
//!
//! Probes are deduplicated by URL fingerprint through the cache: a URL
//! whose result is already cached is answered from the cache with no
//! network call and no write. Every successful mutation re-reads the
//! "all statuses" collection and the owning server's name grouping from
//! storage and overwrites both.

use futures::stream::{self, StreamExt};
use pulse_db::{
    NewServer, NewServerStatus, Server, ServerRepository, ServerStatus, StatusRepository,
};
use pulse_probe::{ProbeOutcome, Prober};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheExecutor, keys};
use crate::config::{DEFAULT_SERVER_ID, StatusConfig};
use crate::error::CoreError;
use crate::validation::{require_non_blank, validate_id};

/// Fields a caller supplies when creating or updating a status
#[derive(Debug, Clone)]
pub struct StatusInput {
    pub url: String,
    pub is_available: bool,
    pub message: String,
    /// Owning server; the default server is used when absent on create
    /// and the current owner is kept when absent on update
    pub server_id: Option<i64>,
}

/// Per-URL result of the first phase of a bulk check
enum Check {
    Cached(ServerStatus),
    Probed {
        key: String,
        status: NewServerStatus,
    },
}

pub struct StatusService {
    servers: Arc<dyn ServerRepository>,
    statuses: Arc<dyn StatusRepository>,
    prober: Arc<dyn Prober>,
    cache: CacheExecutor,
    config: StatusConfig,
    /// Serializes lookup-or-create of the default server
    default_server: Mutex<()>,
}

impl StatusService {
    /// Create a new status service
    pub fn new(
        servers: Arc<dyn ServerRepository>,
        statuses: Arc<dyn StatusRepository>,
        prober: Arc<dyn Prober>,
        cache: CacheExecutor,
        config: StatusConfig,
    ) -> Self {
        info!(
            "Initializing status service (max concurrency: {}, default server: {})",
            config.max_concurrency, config.default_server_name
        );

        Self {
            servers,
            statuses,
            prober,
            cache,
            config,
            default_server: Mutex::new(()),
        }
    }

    // ==================== Probing ====================

    /// Check a single URL, or return the cached result of an earlier check
    pub async fn check_status(&self, url: &str) -> Result<ServerStatus, CoreError> {
        require_non_blank(url, "url")?;
        let url = url.trim();

        self.cache
            .read_one_or_load(&keys::probe_key(url), || async {
                let outcome = self.probe(url).await;
                let server = self.resolve_default_server().await?;

                let saved = self
                    .statuses
                    .insert_status(NewServerStatus {
                        url: url.to_string(),
                        is_available: outcome.available,
                        message: outcome.message,
                        server_id: server.id,
                    })
                    .await?;

                self.cache.store().put_status(&saved);
                self.refresh_status_views(&server.name).await?;
                Ok::<_, CoreError>(saved)
            })
            .await
    }

    /// Check many URLs; results follow the input order
    ///
    /// Uncached URLs are probed concurrently (bounded by
    /// `max_concurrency`) and persisted together in one batch once every
    /// probe has finished. Cached results pass through untouched.
    pub async fn check_statuses(&self, urls: &[String]) -> Result<Vec<ServerStatus>, CoreError> {
        if urls.is_empty() {
            return Err(CoreError::InvalidInput(
                "at least one url is required".to_string(),
            ));
        }
        for url in urls {
            require_non_blank(url, "url")?;
        }

        self.cache.record_operation();
        let server = self.resolve_default_server().await?;

        let pending: Vec<_> = urls
            .iter()
            .map(|url| self.check_one(url.trim(), server.id))
            .collect();
        let checks: Vec<Check> = stream::iter(pending)
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let batch: Vec<NewServerStatus> = checks
            .iter()
            .filter_map(|check| match check {
                Check::Probed { status, .. } => Some(status.clone()),
                Check::Cached(_) => None,
            })
            .collect();
        let expected = batch.len();

        debug!(
            "Bulk check of {} urls: {} probed, {} cached",
            checks.len(),
            expected,
            checks.len() - expected
        );

        let saved = self.statuses.insert_statuses(batch).await?;
        if saved.len() != expected {
            return Err(CoreError::BatchMismatch {
                expected,
                actual: saved.len(),
            });
        }

        let store = self.cache.store();
        let mut saved = saved.into_iter();
        let mut results = Vec::with_capacity(checks.len());
        for check in checks {
            match check {
                Check::Cached(status) => results.push(status),
                Check::Probed { key, .. } => {
                    if let Some(status) = saved.next() {
                        store.put_status(&status);
                        store.put(&key, status.clone());
                        results.push(status);
                    }
                }
            }
        }

        if expected > 0 {
            self.refresh_status_views(&server.name).await?;
        }
        Ok(results)
    }

    async fn check_one(&self, url: &str, server_id: i64) -> Check {
        let key = keys::probe_key(url);
        if let Some(cached) = self.cache.store().get::<ServerStatus>(&key) {
            debug!("Cache hit for probe of {}", url);
            metrics::counter!("pulse_cache_hits_total").increment(1);
            return Check::Cached(cached);
        }
        metrics::counter!("pulse_cache_misses_total").increment(1);

        let outcome = self.probe(url).await;
        Check::Probed {
            key,
            status: NewServerStatus {
                url: url.to_string(),
                is_available: outcome.available,
                message: outcome.message,
                server_id,
            },
        }
    }

    async fn probe(&self, url: &str) -> ProbeOutcome {
        let outcome = self.prober.probe(url).await;
        let label = if outcome.available { "available" } else { "unavailable" };
        metrics::counter!("pulse_probes_total", "outcome" => label).increment(1);
        outcome
    }

    /// Find the fallback server, creating it on first use
    async fn resolve_default_server(&self) -> Result<Server, CoreError> {
        let _guard = self.default_server.lock().await;

        if let Some(server) = self.servers.get_server(DEFAULT_SERVER_ID).await? {
            return Ok(server);
        }

        let servers = self.servers.list_servers().await?;
        if let Some(server) = servers
            .into_iter()
            .find(|s| s.name == self.config.default_server_name)
        {
            return Ok(server);
        }

        let server = self
            .servers
            .insert_server(NewServer {
                name: self.config.default_server_name.clone(),
            })
            .await?;
        info!("Created default server {} ({})", server.id, server.name);

        let store = self.cache.store();
        store.put_server(&server);
        store.put_all_servers(self.servers.list_servers().await?);
        Ok(server)
    }

    // ==================== Status CRUD ====================

    pub async fn create_status(&self, input: StatusInput) -> Result<ServerStatus, CoreError> {
        require_non_blank(&input.url, "url")?;
        if let Some(server_id) = input.server_id {
            validate_id(server_id, "server")?;
        }

        self.cache
            .write_through(
                || async {
                    let server = match input.server_id {
                        Some(server_id) => self.require_server(server_id).await?,
                        None => self.resolve_default_server().await?,
                    };

                    let saved = self
                        .statuses
                        .insert_status(NewServerStatus {
                            url: input.url.trim().to_string(),
                            is_available: input.is_available,
                            message: input.message.clone(),
                            server_id: server.id,
                        })
                        .await?;

                    self.refresh_status_views(&server.name).await?;
                    Ok::<_, CoreError>(saved)
                },
                |saved| keys::status_key(saved.id),
            )
            .await
    }

    pub async fn get_status(&self, id: i64) -> Result<ServerStatus, CoreError> {
        validate_id(id, "status")?;

        self.cache
            .read_one_or_load(&keys::status_key(id), || async {
                self.statuses
                    .get_status(id)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(format!("server status {}", id)))
            })
            .await
    }

    pub async fn list_statuses(&self) -> Result<Vec<ServerStatus>, CoreError> {
        self.cache
            .read_many_or_load(keys::ALL_STATUSES, || async {
                Ok::<_, CoreError>(self.statuses.list_statuses().await?)
            })
            .await
    }

    pub async fn list_statuses_by_server_name(
        &self,
        name: &str,
    ) -> Result<Vec<ServerStatus>, CoreError> {
        require_non_blank(name, "server name")?;

        self.cache
            .read_many_or_load(&keys::statuses_by_server_key(name), || async {
                Ok::<_, CoreError>(self.statuses.list_statuses_by_server_name(name).await?)
            })
            .await
    }

    /// Overwrite a status; cached probe results are dropped since they may
    /// hold the record's previous contents
    pub async fn update_status(
        &self,
        id: i64,
        input: StatusInput,
    ) -> Result<ServerStatus, CoreError> {
        validate_id(id, "status")?;
        require_non_blank(&input.url, "url")?;
        if let Some(server_id) = input.server_id {
            validate_id(server_id, "server")?;
        }

        let updated = self
            .cache
            .write_through(
                || async {
                    let mut status = self
                        .statuses
                        .get_status(id)
                        .await?
                        .ok_or_else(|| CoreError::NotFound(format!("server status {}", id)))?;
                    let previous_server_id = status.server_id;
                    let server = self
                        .require_server(input.server_id.unwrap_or(previous_server_id))
                        .await?;

                    status.url = input.url.trim().to_string();
                    status.is_available = input.is_available;
                    status.message = input.message.clone();
                    status.server_id = server.id;

                    let saved = self.statuses.update_status(&status).await?;
                    self.refresh_status_views(&server.name).await?;

                    if previous_server_id != server.id {
                        if let Some(previous) = self.servers.get_server(previous_server_id).await? {
                            if previous.name != server.name {
                                self.refresh_grouping(&previous.name).await?;
                            }
                        }
                    }
                    Ok::<_, CoreError>(saved)
                },
                |saved| keys::status_key(saved.id),
            )
            .await?;

        self.cache.store().invalidate_prefix(keys::PROBE_PREFIX);
        Ok(updated)
    }

    /// Delete a status and every aggregate or probe entry that could still
    /// return it
    pub async fn delete_status(&self, id: i64) -> Result<(), CoreError> {
        validate_id(id, "status")?;

        self.cache
            .invalidate_after_write(&keys::status_key(id), || async {
                if !self.statuses.delete_status(id).await? {
                    return Err(CoreError::NotFound(format!("server status {}", id)));
                }
                Ok::<_, CoreError>(())
            })
            .await?;

        let store = self.cache.store();
        store.invalidate_prefix(keys::ALL_STATUSES);
        store.invalidate_prefix(keys::STATUSES_BY_SERVER_PREFIX);
        store.invalidate_prefix(keys::PROBE_PREFIX);

        info!("Deleted server status {}", id);
        Ok(())
    }

    async fn require_server(&self, id: i64) -> Result<Server, CoreError> {
        self.servers
            .get_server(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("server {}", id)))
    }

    async fn refresh_status_views(&self, server_name: &str) -> Result<(), CoreError> {
        let all = self.statuses.list_statuses().await?;
        self.cache.store().put_all_statuses(all);
        self.refresh_grouping(server_name).await
    }

    async fn refresh_grouping(&self, server_name: &str) -> Result<(), CoreError> {
        let grouped = self.statuses.list_statuses_by_server_name(server_name).await?;
        self.cache
            .store()
            .put_statuses_by_server_name(server_name, grouped);
        Ok(())
    }
}
