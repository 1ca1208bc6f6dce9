//! Server operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewServer, Server};
use crate::repository::Database;

impl Database {
    // ==================== Server Operations ====================

    /// Insert a new server
    pub async fn insert_server(&self, server: NewServer) -> Result<Server, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO servers (name, created_at, updated_at)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&server.name)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Server {
            id,
            name: server.name,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a server by ID
    pub async fn get_server_by_id(&self, id: i64) -> Result<Option<Server>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM servers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Server::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all servers
    pub async fn list_servers(&self) -> Result<Vec<Server>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM servers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Server::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Save the mutable fields of an existing server
    pub async fn update_server(&self, server: &Server) -> Result<Server, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE servers
            SET name = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&server.name)
        .bind(now.to_rfc3339())
        .bind(server.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("server {}", server.id)));
        }

        Ok(Server {
            updated_at: now,
            ..server.clone()
        })
    }

    /// Delete a server; its statuses go with it
    pub async fn delete_server(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM servers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::NewServer;
    use crate::repository::test_support::open;

    #[tokio::test]
    async fn test_server_crud() {
        let dir = tempfile::tempdir().unwrap();
        let db = open(&dir).await;

        let created = db
            .insert_server(NewServer {
                name: "edge-1".to_string(),
            })
            .await
            .unwrap();
        assert!(created.id > 0);

        let fetched = db.get_server_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "edge-1");

        let mut renamed = fetched.clone();
        renamed.name = "edge-2".to_string();
        let saved = db.update_server(&renamed).await.unwrap();
        assert_eq!(saved.name, "edge-2");

        assert_eq!(db.list_servers().await.unwrap().len(), 1);
        assert!(db.delete_server(created.id).await.unwrap());
        assert!(!db.delete_server(created.id).await.unwrap());
        assert!(db.get_server_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_server() {
        let dir = tempfile::tempdir().unwrap();
        let db = open(&dir).await;

        let created = db
            .insert_server(NewServer {
                name: "ghost".to_string(),
            })
            .await
            .unwrap();
        db.delete_server(created.id).await.unwrap();

        let err = db.update_server(&created).await.unwrap_err();
        assert!(matches!(err, crate::DbError::NotFound(_)));
    }
}
