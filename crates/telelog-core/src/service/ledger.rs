//! Ledger service: the one place handlers talk to storage through.
//!
//! Orchestrates the user/message/session repositories for the dispatcher
//! and CLI: upsert-then-append on inbound messages, stats and recent-N
//! reads keyed by the public telegram id rather than internal row ids.

use chrono::Utc;
use tracing::info;

use telelog_types::error::LedgerError;
use telelog_types::message::{Message, MessageKind, NewMessage};
use telelog_types::session::ChatSession;
use telelog_types::user::{TelegramUser, User, UserStats};

use crate::repository::message::MessageRepository;
use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;

/// Service orchestrating user, message, and session persistence.
///
/// Generic over the repository traits to maintain clean architecture --
/// telelog-core never depends on telelog-infra. Stateless across calls and
/// safe to invoke concurrently.
pub struct LedgerService<U: UserRepository, M: MessageRepository, S: SessionRepository> {
    user_repo: U,
    message_repo: M,
    session_repo: S,
}

impl<U: UserRepository, M: MessageRepository, S: SessionRepository> LedgerService<U, M, S> {
    pub fn new(user_repo: U, message_repo: M, session_repo: S) -> Self {
        Self {
            user_repo,
            message_repo,
            session_repo,
        }
    }

    /// Record a contact from a user without logging a message (e.g. /start).
    ///
    /// Creates the user row on first contact, refreshes it otherwise.
    pub async fn record_contact(&self, profile: &TelegramUser) -> Result<User, LedgerError> {
        let user = self.user_repo.upsert(profile).await?;
        // The upsert writes created_at == updated_at only on first insert.
        if user.created_at == user.updated_at {
            info!(telegram_id = user.telegram_id, name = %profile.display_name(), "created new user");
        }
        Ok(user)
    }

    /// Record one inbound message: upsert the sender, then append the row.
    ///
    /// Two independent units of work, not one transaction; a failure of the
    /// append leaves the refreshed user row in place, which is fine because
    /// the user refresh is idempotent.
    pub async fn record_message(
        &self,
        profile: &TelegramUser,
        chat_id: i64,
        message_id: i64,
        text: String,
        kind: MessageKind,
    ) -> Result<(User, Message), LedgerError> {
        let user = self.record_contact(profile).await?;
        let message = self
            .message_repo
            .save(&NewMessage {
                user_id: user.id,
                message_id,
                chat_id,
                text,
                kind,
                created_at: Utc::now(),
            })
            .await?;
        Ok((user, message))
    }

    /// Stats for a user keyed by telegram id.
    ///
    /// `None` when the id was never seen; zero-valued stats when the user
    /// exists but has no messages.
    pub async fn user_stats(
        &self,
        telegram_id: i64,
    ) -> Result<Option<(User, UserStats)>, LedgerError> {
        let Some(user) = self.user_repo.get_by_telegram_id(telegram_id).await? else {
            return Ok(None);
        };
        let stats = self.message_repo.stats_for_user(user.id).await?;
        Ok(Some((user, stats)))
    }

    /// Most recent `limit` messages for a user, newest first.
    ///
    /// Empty when the user is unknown or `limit` is non-positive.
    pub async fn recent_messages(
        &self,
        telegram_id: i64,
        limit: i64,
    ) -> Result<Vec<Message>, LedgerError> {
        let Some(user) = self.user_repo.get_by_telegram_id(telegram_id).await? else {
            return Ok(Vec::new());
        };
        Ok(self.message_repo.recent_for_user(user.id, limit).await?)
    }

    /// Load the conversational state stored for a user, if any.
    pub async fn load_session(
        &self,
        telegram_id: i64,
    ) -> Result<Option<ChatSession>, LedgerError> {
        let Some(user) = self.user_repo.get_by_telegram_id(telegram_id).await? else {
            return Ok(None);
        };
        Ok(self.session_repo.get(user.id).await?)
    }

    /// Store (insert-or-replace) the conversational state for a user.
    pub async fn store_session(
        &self,
        telegram_id: i64,
        data: &serde_json::Value,
    ) -> Result<ChatSession, LedgerError> {
        let user = self
            .user_repo
            .get_by_telegram_id(telegram_id)
            .await?
            .ok_or(LedgerError::UserNotFound)?;
        Ok(self.session_repo.put(user.id, data).await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
