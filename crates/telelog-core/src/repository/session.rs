//! Chat session repository trait definition.

use telelog_types::error::RepositoryError;
use telelog_types::session::ChatSession;

/// Repository trait for per-user conversational state.
///
/// One session payload per user; `put` upserts keyed on the user id.
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait SessionRepository: Send + Sync {
    /// Fetch the session payload for a user, if one has been stored.
    fn get(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Insert-or-replace the session payload for a user.
    ///
    /// Fails with `RepositoryError::NotFound` when `user_id` does not
    /// reference an existing user.
    fn put(
        &self,
        user_id: i64,
        data: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;
}
