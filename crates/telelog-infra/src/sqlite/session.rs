//! SQLite chat session repository implementation.
//!
//! One session row per user (UNIQUE on `user_id`), so `put` is the same
//! atomic `ON CONFLICT DO UPDATE ... RETURNING` shape as the user upsert.

use sqlx::Row;

use telelog_core::repository::session::SessionRepository;
use telelog_types::error::RepositoryError;
use telelog_types::session::ChatSession;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct SessionRow {
    id: i64,
    user_id: i64,
    session_data: String,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            session_data: row.try_get("session_data")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        let session_data: serde_json::Value = serde_json::from_str(&self.session_data)
            .map_err(|e| RepositoryError::Query(format!("invalid session payload JSON: {e}")))?;
        Ok(ChatSession {
            id: self.id,
            user_id: self.user_id,
            session_data,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// SessionRepository impl
// ---------------------------------------------------------------------------

impl SessionRepository for SqliteSessionRepository {
    async fn get(&self, user_id: i64) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let session = SessionRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_session()?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        user_id: i64,
        data: &serde_json::Value,
    ) -> Result<ChatSession, RepositoryError> {
        let payload = serde_json::to_string(data)
            .map_err(|e| RepositoryError::Query(format!("serialize session payload: {e}")))?;
        let now = format_datetime(&chrono::Utc::now());

        let result = sqlx::query(
            r#"INSERT INTO chat_sessions (user_id, session_data, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                   session_data = excluded.session_data,
                   updated_at = excluded.updated_at
               RETURNING *"#,
        )
        .bind(user_id)
        .bind(&payload)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool.writer)
        .await;

        match result {
            Ok(row) => SessionRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_session(),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::user::SqliteUserRepository;
    use serde_json::json;
    use telelog_core::repository::user::UserRepository;
    use telelog_types::user::TelegramUser;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn make_user(pool: &DatabasePool) -> i64 {
        let repo = SqliteUserRepository::new(pool.clone());
        repo.upsert(&TelegramUser {
            id: 42,
            username: Some("ana".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: None,
            language_code: None,
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_get_missing_session_is_none() {
        let pool = test_pool().await;
        let user_id = make_user(&pool).await;
        let repo = SqliteSessionRepository::new(pool);

        assert!(repo.get(user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let pool = test_pool().await;
        let user_id = make_user(&pool).await;
        let repo = SqliteSessionRepository::new(pool);

        repo.put(user_id, &json!({"last_command": "start"})).await.unwrap();

        let session = repo.get(user_id).await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.session_data["last_command"], "start");
    }

    #[tokio::test]
    async fn test_put_replaces_payload_in_same_row() {
        let pool = test_pool().await;
        let user_id = make_user(&pool).await;
        let repo = SqliteSessionRepository::new(pool.clone());

        let first = repo.put(user_id, &json!({"turns": 1})).await.unwrap();
        let second = repo.put(user_id, &json!({"turns": 2})).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.session_data["turns"], 2);
        assert_eq!(second.created_at, first.created_at);

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_sessions")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_put_unknown_user_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteSessionRepository::new(pool);

        let err = repo.put(999, &json!({})).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
