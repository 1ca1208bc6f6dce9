//! Server service
//!
//! CRUD over servers through the cache-aside executor. A rename refreshes
//! the status groupings of both names, and a delete clears every status
//! entry since storage cascades the server's statuses.

use pulse_db::{NewServer, Server, ServerRepository, StatusRepository};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::{CacheExecutor, keys};
use crate::error::CoreError;
use crate::validation::{require_non_blank, validate_id};

pub struct ServerService {
    servers: Arc<dyn ServerRepository>,
    statuses: Arc<dyn StatusRepository>,
    cache: CacheExecutor,
}

impl ServerService {
    /// Create a new server service
    pub fn new(
        servers: Arc<dyn ServerRepository>,
        statuses: Arc<dyn StatusRepository>,
        cache: CacheExecutor,
    ) -> Self {
        Self {
            servers,
            statuses,
            cache,
        }
    }

    pub async fn create_server(&self, name: &str) -> Result<Server, CoreError> {
        require_non_blank(name, "server name")?;

        let server = self
            .cache
            .write_through(
                || async {
                    let saved = self
                        .servers
                        .insert_server(NewServer {
                            name: name.to_string(),
                        })
                        .await?;
                    self.refresh_server_list().await?;
                    Ok::<_, CoreError>(saved)
                },
                |saved| keys::server_key(saved.id),
            )
            .await?;

        info!("Created server {} ({})", server.id, server.name);
        Ok(server)
    }

    pub async fn get_server(&self, id: i64) -> Result<Server, CoreError> {
        validate_id(id, "server")?;

        self.cache
            .read_one_or_load(&keys::server_key(id), || async {
                self.servers
                    .get_server(id)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(format!("server {}", id)))
            })
            .await
    }

    pub async fn list_servers(&self) -> Result<Vec<Server>, CoreError> {
        self.cache
            .read_many_or_load(keys::ALL_SERVERS, || async {
                Ok::<_, CoreError>(self.servers.list_servers().await?)
            })
            .await
    }

    pub async fn update_server(&self, id: i64, name: &str) -> Result<Server, CoreError> {
        validate_id(id, "server")?;
        require_non_blank(name, "server name")?;

        self.cache
            .write_through(
                || async {
                    let mut server = self
                        .servers
                        .get_server(id)
                        .await?
                        .ok_or_else(|| CoreError::NotFound(format!("server {}", id)))?;
                    let previous_name = std::mem::replace(&mut server.name, name.to_string());

                    let saved = self.servers.update_server(&server).await?;
                    self.refresh_server_list().await?;
                    self.refresh_grouping(&saved.name).await?;
                    if previous_name != saved.name {
                        debug!("Server {} renamed from {} to {}", id, previous_name, saved.name);
                        self.refresh_grouping(&previous_name).await?;
                    }
                    Ok::<_, CoreError>(saved)
                },
                |saved| keys::server_key(saved.id),
            )
            .await
    }

    pub async fn delete_server(&self, id: i64) -> Result<(), CoreError> {
        validate_id(id, "server")?;

        self.cache
            .invalidate_after_write(&keys::server_key(id), || async {
                if !self.servers.delete_server(id).await? {
                    return Err(CoreError::NotFound(format!("server {}", id)));
                }
                Ok::<_, CoreError>(())
            })
            .await?;

        let store = self.cache.store();
        store.clear_server_cache();
        store.clear_status_cache();

        info!("Deleted server {}", id);
        Ok(())
    }

    async fn refresh_server_list(&self) -> Result<(), CoreError> {
        let servers = self.servers.list_servers().await?;
        self.cache.store().put_all_servers(servers);
        Ok(())
    }

    async fn refresh_grouping(&self, name: &str) -> Result<(), CoreError> {
        let statuses = self.statuses.list_statuses_by_server_name(name).await?;
        self.cache.store().put_statuses_by_server_name(name, statuses);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryRepository, status_input};
    use pulse_db::NewServerStatus;

    fn service() -> (ServerService, Arc<MemoryRepository>, CacheExecutor) {
        let repo = Arc::new(MemoryRepository::default());
        let cache = CacheExecutor::default();
        let service = ServerService::new(repo.clone(), repo.clone(), cache.clone());
        (service, repo, cache)
    }

    #[tokio::test]
    async fn test_create_caches_entity_and_list() {
        let (service, repo, cache) = service();

        let created = service.create_server("web").await.unwrap();

        assert_eq!(cache.store().get_server(created.id).unwrap().name, "web");
        assert_eq!(
            cache.store().get_many::<Server>(keys::ALL_SERVERS).unwrap().len(),
            1
        );

        let reads_before = repo.reads();
        assert_eq!(service.get_server(created.id).await.unwrap().name, "web");
        assert_eq!(service.list_servers().await.unwrap().len(), 1);
        assert_eq!(repo.reads(), reads_before);
    }

    #[tokio::test]
    async fn test_invalid_input_touches_nothing() {
        let (service, repo, cache) = service();

        assert!(matches!(
            service.create_server("  ").await,
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            service.get_server(0).await,
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            service.update_server(-1, "x").await,
            Err(CoreError::InvalidInput(_))
        ));

        assert_eq!(cache.operation_count(), 0);
        assert_eq!(repo.reads(), 0);
        assert!(cache.store().is_empty());
    }

    #[tokio::test]
    async fn test_missing_server_is_not_found_and_not_cached() {
        let (service, _repo, cache) = service();

        assert!(matches!(
            service.get_server(42).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(cache.store().get_server(42).is_none());
        assert!(matches!(
            service.update_server(42, "x").await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_server(42).await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_bypasses_cached_entry() {
        let (service, _repo, _cache) = service();
        let created = service.create_server("old").await.unwrap();
        service.get_server(created.id).await.unwrap();

        let updated = service.update_server(created.id, "new").await.unwrap();

        assert_eq!(updated.name, "new");
        assert_eq!(service.get_server(created.id).await.unwrap().name, "new");
        assert_eq!(service.list_servers().await.unwrap()[0].name, "new");
    }

    #[tokio::test]
    async fn test_rename_moves_status_grouping() {
        let (service, repo, cache) = service();
        let created = service.create_server("old").await.unwrap();
        repo.seed_status(status_input("http://a.example", created.id));
        cache
            .store()
            .put_statuses_by_server_name("old", repo.statuses_named("old"));
        assert_eq!(repo.statuses_named("old").len(), 1);

        service.update_server(created.id, "new").await.unwrap();

        let store = cache.store();
        let under_new = store
            .get_many::<pulse_db::ServerStatus>(&keys::statuses_by_server_key("new"))
            .unwrap();
        let under_old = store
            .get_many::<pulse_db::ServerStatus>(&keys::statuses_by_server_key("old"))
            .unwrap();
        assert_eq!(under_new.len(), 1);
        assert!(under_old.is_empty());
    }

    #[tokio::test]
    async fn test_delete_clears_server_and_status_entries() {
        let (service, repo, cache) = service();
        let created = service.create_server("web").await.unwrap();
        let seeded = repo.seed_status(NewServerStatus {
            url: "http://a.example".to_string(),
            is_available: true,
            message: "available".to_string(),
            server_id: created.id,
        });
        cache.store().put_status(&seeded);
        cache.store().put_all_statuses(vec![seeded.clone()]);

        service.delete_server(created.id).await.unwrap();

        let store = cache.store();
        assert!(store.get_server(created.id).is_none());
        assert!(store.get_by_key(keys::ALL_SERVERS).is_none());
        assert!(store.get_status(seeded.id).is_none());
        assert!(store.get_by_key(keys::ALL_STATUSES).is_none());
        assert!(service.list_servers().await.unwrap().is_empty());
        assert!(matches!(
            service.get_server(created.id).await,
            Err(CoreError::NotFound(_))
        ));
    }
}
