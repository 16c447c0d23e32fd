//! SQLite history repository implementation.
//!
//! Implements `HistoryRepository` from `palaver-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, one pooled connection
//! per operation.

use chrono::{DateTime, Utc};
use palaver_core::history::repository::HistoryRepository;
use palaver_types::chat::{ChatMessage, MessageReceipt};
use palaver_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::{DatabasePool, classify_error};

/// SQLite-backed implementation of `HistoryRepository`.
pub struct SqliteHistoryRepository {
    pool: DatabasePool,
}

impl SqliteHistoryRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatMessageRow {
    id: String,
    role: String,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        Ok(ChatMessage {
            id: parse_id(&self.id)?,
            role: self.role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn parse_id(s: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

// ---------------------------------------------------------------------------
// HistoryRepository implementation
// ---------------------------------------------------------------------------

impl HistoryRepository for SqliteHistoryRepository {
    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut conn = self.pool.read_conn().await?;

        let rows = sqlx::query(
            "SELECT id, role, content, created_at FROM chat_messages ORDER BY created_at ASC, seq ASC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(classify_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = ChatMessageRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn append(&self, role: &str, content: &str) -> Result<MessageReceipt, RepositoryError> {
        let mut conn = self.pool.write_conn().await?;

        // created_at comes from the column default so the store owns the clock
        let row = sqlx::query(
            "INSERT INTO chat_messages (id, role, content) VALUES (?, ?, ?) RETURNING id, created_at",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(role)
        .bind(content)
        .fetch_one(&mut *conn)
        .await
        .map_err(classify_error)?;

        let id: String = row
            .try_get("id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(MessageReceipt {
            id: parse_id(&id)?,
            created_at: parse_datetime(&created_at)?,
        })
    }

    async fn clear_all(&self) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.write_conn().await?;

        let result = sqlx::query("DELETE FROM chat_messages")
            .execute(&mut *conn)
            .await
            .map_err(classify_error)?;

        Ok(result.rows_affected())
    }
}
