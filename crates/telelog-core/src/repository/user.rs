//! User repository trait definition.

use telelog_types::error::RepositoryError;
use telelog_types::user::{TelegramUser, User};

/// Repository trait for user persistence.
///
/// Implementations live in telelog-infra (e.g., SqliteUserRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait UserRepository: Send + Sync {
    /// Atomically insert-or-refresh the user row for `profile.id`.
    ///
    /// Must be a single conditional insert (insert-or-update keyed on the
    /// unique telegram id), not a check-then-insert race. Idempotent under
    /// repeated identical input: afterwards exactly one row exists and its
    /// mutable fields equal the latest call's. `created_at` is preserved on
    /// refresh; `is_active` is set and `updated_at` bumped on every contact.
    fn upsert(
        &self,
        profile: &TelegramUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by the platform-assigned telegram id.
    fn get_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
