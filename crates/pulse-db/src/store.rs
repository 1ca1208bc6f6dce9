//! Repository traits
//!
//! The core only talks to persistence through these two traits, so any
//! store offering CRUD plus the by-server-name query can back it.
//! [`Database`] is the SQLite implementation.

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewServer, NewServerStatus, Server, ServerStatus};
use crate::repository::Database;

/// Persistence for servers
#[async_trait]
pub trait ServerRepository: Send + Sync {
    /// Persist a new server
    async fn insert_server(&self, server: NewServer) -> Result<Server, DbError>;

    /// Save an existing server; `NotFound` if the id is gone
    async fn update_server(&self, server: &Server) -> Result<Server, DbError>;

    async fn get_server(&self, id: i64) -> Result<Option<Server>, DbError>;

    async fn list_servers(&self) -> Result<Vec<Server>, DbError>;

    /// Returns whether a row was removed
    async fn delete_server(&self, id: i64) -> Result<bool, DbError>;
}

/// Persistence for server statuses
#[async_trait]
pub trait StatusRepository: Send + Sync {
    async fn insert_status(&self, status: NewServerStatus) -> Result<ServerStatus, DbError>;

    /// Persist a batch as one unit, preserving input order
    async fn insert_statuses(
        &self,
        statuses: Vec<NewServerStatus>,
    ) -> Result<Vec<ServerStatus>, DbError>;

    async fn update_status(&self, status: &ServerStatus) -> Result<ServerStatus, DbError>;

    async fn get_status(&self, id: i64) -> Result<Option<ServerStatus>, DbError>;

    async fn list_statuses(&self) -> Result<Vec<ServerStatus>, DbError>;

    async fn delete_status(&self, id: i64) -> Result<bool, DbError>;

    async fn list_statuses_by_server_name(&self, name: &str)
    -> Result<Vec<ServerStatus>, DbError>;
}

#[async_trait]
impl ServerRepository for Database {
    async fn insert_server(&self, server: NewServer) -> Result<Server, DbError> {
        Database::insert_server(self, server).await
    }

    async fn update_server(&self, server: &Server) -> Result<Server, DbError> {
        Database::update_server(self, server).await
    }

    async fn get_server(&self, id: i64) -> Result<Option<Server>, DbError> {
        self.get_server_by_id(id).await
    }

    async fn list_servers(&self) -> Result<Vec<Server>, DbError> {
        Database::list_servers(self).await
    }

    async fn delete_server(&self, id: i64) -> Result<bool, DbError> {
        Database::delete_server(self, id).await
    }
}

#[async_trait]
impl StatusRepository for Database {
    async fn insert_status(&self, status: NewServerStatus) -> Result<ServerStatus, DbError> {
        Database::insert_status(self, status).await
    }

    async fn insert_statuses(
        &self,
        statuses: Vec<NewServerStatus>,
    ) -> Result<Vec<ServerStatus>, DbError> {
        Database::insert_statuses(self, statuses).await
    }

    async fn update_status(&self, status: &ServerStatus) -> Result<ServerStatus, DbError> {
        Database::update_status(self, status).await
    }

    async fn get_status(&self, id: i64) -> Result<Option<ServerStatus>, DbError> {
        self.get_status_by_id(id).await
    }

    async fn list_statuses(&self) -> Result<Vec<ServerStatus>, DbError> {
        Database::list_statuses(self).await
    }

    async fn delete_status(&self, id: i64) -> Result<bool, DbError> {
        Database::delete_status(self, id).await
    }

    async fn list_statuses_by_server_name(
        &self,
        name: &str,
    ) -> Result<Vec<ServerStatus>, DbError> {
        Database::list_statuses_by_server_name(self, name).await
    }
}
