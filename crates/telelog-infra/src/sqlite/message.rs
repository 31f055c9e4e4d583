//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `telelog-core` using sqlx with split
//! read/write pools. The message log is append-only; reads are the recent-N
//! query behind /messages and the COUNT/MIN/MAX aggregate behind /stats.

use sqlx::Row;

use telelog_core::repository::message::MessageRepository;
use telelog_types::error::RepositoryError;
use telelog_types::message::{Message, MessageKind, NewMessage};
use telelog_types::user::UserStats;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct MessageRow {
    id: i64,
    user_id: i64,
    message_id: i64,
    chat_id: i64,
    text: String,
    message_type: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            message_id: row.try_get("message_id")?,
            chat_id: row.try_get("chat_id")?,
            text: row.try_get("text")?,
            message_type: row.try_get("message_type")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        // MessageKind::from_str maps unknown tags to Other and never fails.
        let kind: MessageKind = self.message_type.parse().unwrap_or_default();
        Ok(Message {
            id: self.id,
            user_id: self.user_id,
            message_id: self.message_id,
            chat_id: self.chat_id,
            text: self.text,
            kind,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// MessageRepository impl
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn save(&self, msg: &NewMessage) -> Result<Message, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO messages
               (user_id, message_id, chat_id, text, message_type, created_at)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(msg.user_id)
        .bind(msg.message_id)
        .bind(msg.chat_id)
        .bind(&msg.text)
        .bind(msg.kind.to_string())
        .bind(format_datetime(&msg.created_at))
        .fetch_one(&self.pool.writer)
        .await;

        match result {
            Ok(row) => MessageRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_message(),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn recent_for_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Message>, RepositoryError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"SELECT * FROM messages
               WHERE user_id = ?
               ORDER BY created_at DESC, id ASC
               LIMIT ?"#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut msgs = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            msgs.push(r.into_message()?);
        }
        Ok(msgs)
    }

    async fn stats_for_user(&self, user_id: i64) -> Result<UserStats, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT COUNT(*) AS message_count,
                      MIN(created_at) AS first_at,
                      MAX(created_at) AS last_at
               FROM messages WHERE user_id = ?"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let message_count: i64 = row
            .try_get("message_count")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let first_at: Option<String> = row
            .try_get("first_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let last_at: Option<String> = row
            .try_get("last_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(UserStats {
            message_count: message_count as u64,
            first_message_at: first_at.as_deref().map(parse_datetime).transpose()?,
            last_message_at: last_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
