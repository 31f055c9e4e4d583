//! User domain types for Telelog.
//!
//! `TelegramUser` is the inbound descriptor taken from an update envelope;
//! `User` is the persisted row keyed by the platform-assigned `telegram_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inbound user descriptor from the messaging platform.
///
/// Carries exactly the fields the upsert refreshes on every contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramUser {
    /// Stable identifier assigned by Telegram to the account.
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// IETF language tag reported by the client (e.g. "en", "pt-br").
    pub language_code: Option<String>,
}

impl TelegramUser {
    /// Best display handle for logs and replies: username, else first name,
    /// else the numeric id.
    pub fn display_name(&self) -> String {
        if let Some(username) = &self.username {
            format!("@{username}")
        } else if let Some(first) = &self.first_name {
            first.clone()
        } else {
            self.id.to_string()
        }
    }
}

/// A persisted user row.
///
/// Exactly one row exists per `telegram_id`; created on first contact and
/// refreshed (mutable fields + `updated_at`) on every subsequent one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Internal row id (messages reference this, not `telegram_id`).
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate message statistics for one user.
///
/// Zero-valued (count 0, no timestamps) for a user with no messages;
/// that case is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub message_count: u64,
    pub first_message_at: Option<DateTime<Utc>>,
    pub last_message_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_username() {
        let user = TelegramUser {
            id: 42,
            username: Some("ana".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: None,
            language_code: Some("en".to_string()),
        };
        assert_eq!(user.display_name(), "@ana");
    }

    #[test]
    fn test_display_name_falls_back_to_first_name_then_id() {
        let mut user = TelegramUser {
            id: 42,
            username: None,
            first_name: Some("Ana".to_string()),
            last_name: None,
            language_code: None,
        };
        assert_eq!(user.display_name(), "Ana");

        user.first_name = None;
        assert_eq!(user.display_name(), "42");
    }

    #[test]
    fn test_user_stats_default_is_zeroed() {
        let stats = UserStats::default();
        assert_eq!(stats.message_count, 0);
        assert!(stats.first_message_at.is_none());
        assert!(stats.last_message_at.is_none());
    }

    #[test]
    fn test_user_serde_roundtrip() {
        let user = User {
            id: 1,
            telegram_id: 42,
            username: Some("ana".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: None,
            language_code: Some("en".to_string()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        let parsed: User = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.telegram_id, 42);
        assert!(parsed.is_active);
    }
}
