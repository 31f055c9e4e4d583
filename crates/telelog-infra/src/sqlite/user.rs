//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `telelog-core` using sqlx with split
//! read/write pools. The upsert is a single `INSERT ... ON CONFLICT DO
//! UPDATE ... RETURNING` statement, so concurrent first contact from the
//! same telegram id cannot race a check against an insert.

use sqlx::Row;

use telelog_core::repository::user::UserRepository;
use telelog_types::error::RepositoryError;
use telelog_types::user::{TelegramUser, User};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct UserRow {
    id: i64,
    telegram_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    language_code: Option<String>,
    is_active: i64,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            telegram_id: row.try_get("telegram_id")?,
            username: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            language_code: row.try_get("language_code")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: self.id,
            telegram_id: self.telegram_id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            language_code: self.language_code,
            is_active: self.is_active != 0,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// UserRepository impl
// ---------------------------------------------------------------------------

impl UserRepository for SqliteUserRepository {
    async fn upsert(&self, profile: &TelegramUser) -> Result<User, RepositoryError> {
        // On first insert created_at and updated_at carry the same value;
        // the conflict branch leaves created_at untouched.
        let now = format_datetime(&chrono::Utc::now());

        let result = sqlx::query(
            r#"INSERT INTO users
               (telegram_id, username, first_name, last_name, language_code,
                is_active, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, 1, ?, ?)
               ON CONFLICT(telegram_id) DO UPDATE SET
                   username = excluded.username,
                   first_name = excluded.first_name,
                   last_name = excluded.last_name,
                   language_code = excluded.language_code,
                   is_active = 1,
                   updated_at = excluded.updated_at
               RETURNING *"#,
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.language_code)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool.writer)
        .await;

        match result {
            Ok(row) => UserRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_user(),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("telegram_id {} already exists", profile.id)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE telegram_id = ?")
            .bind(telegram_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user = UserRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_user()?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
