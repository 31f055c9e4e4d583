//! Message repository trait definition.
//!
//! The message log is append-only: `save` is the only write, and nothing
//! here updates or deletes existing rows.

use telelog_types::error::RepositoryError;
use telelog_types::message::{Message, NewMessage};
use telelog_types::user::UserStats;

/// Repository trait for message persistence.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageRepository: Send + Sync {
    /// Append one message row.
    ///
    /// Fails with `RepositoryError::NotFound` when `msg.user_id` does not
    /// reference an existing user; never deduplicates by `message_id`.
    fn save(
        &self,
        msg: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// The most recent `limit` messages for a user, newest first, ties
    /// broken by insertion order. A non-positive `limit` yields an empty
    /// vec rather than an error.
    fn recent_for_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Count plus first/last message timestamps for a user. Zero-valued
    /// stats (not an error) when the user has no messages.
    fn stats_for_user(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<UserStats, RepositoryError>> + Send;
}
