//! Server status operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewServerStatus, ServerStatus};
use crate::repository::Database;

const INSERT_STATUS: &str = r#"
    INSERT INTO server_statuses (url, is_available, message, server_id, checked_at)
    VALUES (?, ?, ?, ?, ?)
    RETURNING id
"#;

impl Database {
    // ==================== Status Operations ====================

    /// Insert a new status record
    pub async fn insert_status(&self, status: NewServerStatus) -> Result<ServerStatus, DbError> {
        let now = Utc::now();
        let result = sqlx::query(INSERT_STATUS)
            .bind(&status.url)
            .bind(status.is_available)
            .bind(&status.message)
            .bind(status.server_id)
            .bind(now.to_rfc3339())
            .fetch_one(&self.pool)
            .await?;

        let id: i64 = result.get("id");
        Ok(status.into_status(id, now))
    }

    /// Insert a batch of status records in one transaction
    ///
    /// Returned records keep the order of the input.
    pub async fn insert_statuses(
        &self,
        statuses: Vec<NewServerStatus>,
    ) -> Result<Vec<ServerStatus>, DbError> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(statuses.len());

        for status in statuses {
            let result = sqlx::query(INSERT_STATUS)
                .bind(&status.url)
                .bind(status.is_available)
                .bind(&status.message)
                .bind(status.server_id)
                .bind(now.to_rfc3339())
                .fetch_one(&mut *tx)
                .await?;

            let id: i64 = result.get("id");
            saved.push(status.into_status(id, now));
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// Get a status by ID
    pub async fn get_status_by_id(&self, id: i64) -> Result<Option<ServerStatus>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, url, is_available, message, server_id, checked_at
            FROM server_statuses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| ServerStatus::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// List all statuses
    pub async fn list_statuses(&self) -> Result<Vec<ServerStatus>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, url, is_available, message, server_id, checked_at
            FROM server_statuses
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| ServerStatus::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// List statuses owned by any server currently carrying `name`
    pub async fn list_statuses_by_server_name(
        &self,
        name: &str,
    ) -> Result<Vec<ServerStatus>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.url, s.is_available, s.message, s.server_id, s.checked_at
            FROM server_statuses s
            JOIN servers srv ON srv.id = s.server_id
            WHERE srv.name = ?
            ORDER BY s.id
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| ServerStatus::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Save every field of an existing status
    pub async fn update_status(&self, status: &ServerStatus) -> Result<ServerStatus, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE server_statuses
            SET url = ?, is_available = ?, message = ?, server_id = ?, checked_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&status.url)
        .bind(status.is_available)
        .bind(&status.message)
        .bind(status.server_id)
        .bind(status.checked_at.to_rfc3339())
        .bind(status.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("server status {}", status.id)));
        }
        Ok(status.clone())
    }

    /// Delete a status
    pub async fn delete_status(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM server_statuses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
