//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// A monitored server
///
/// The statuses a server owns are not embedded; they reference the server
/// through [`ServerStatus::server_id`] and are read back by server name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The persisted outcome of one availability probe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerStatus {
    pub id: i64,
    pub url: String,
    pub is_available: bool,
    pub message: String,
    /// Owning server
    pub server_id: i64,
    pub checked_at: DateTime<Utc>,
}

/// New server (for insertion)
#[derive(Debug, Clone)]
pub struct NewServer {
    pub name: String,
}

/// New server status (for insertion)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServerStatus {
    pub url: String,
    pub is_available: bool,
    pub message: String,
    pub server_id: i64,
}

impl NewServerStatus {
    /// Attach a persisted id, producing the stored record
    pub fn into_status(self, id: i64, checked_at: DateTime<Utc>) -> ServerStatus {
        ServerStatus {
            id,
            url: self.url,
            is_available: self.is_available,
            message: self.message,
            server_id: self.server_id,
            checked_at,
        }
    }
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for Server {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Server {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for ServerStatus {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(ServerStatus {
            id: row.try_get("id")?,
            url: row.try_get("url")?,
            is_available: row.try_get("is_available")?,
            message: row.try_get("message")?,
            server_id: row.try_get("server_id")?,
            checked_at: parse_datetime_or_now(&row.try_get::<String, _>("checked_at")?),
        })
    }
}
