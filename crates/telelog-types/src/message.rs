//! Message domain types for Telelog.
//!
//! `NewMessage` is the insert shape handed to the repository; `Message` is
//! the persisted row. The message log is append-only: rows are never
//! updated or deleted by this system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Coarse content classification for a logged message.
///
/// Stored in the `message_type` column as its lowercase name. Unknown tags
/// read back from storage parse as `Other` rather than failing the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Photo,
    Document,
    Sticker,
    Voice,
    Other,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Text => write!(f, "text"),
            MessageKind::Photo => write!(f, "photo"),
            MessageKind::Document => write!(f, "document"),
            MessageKind::Sticker => write!(f, "sticker"),
            MessageKind::Voice => write!(f, "voice"),
            MessageKind::Other => write!(f, "other"),
        }
    }
}

impl FromStr for MessageKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "text" => MessageKind::Text,
            "photo" => MessageKind::Photo,
            "document" => MessageKind::Document,
            "sticker" => MessageKind::Sticker,
            "voice" => MessageKind::Voice,
            _ => MessageKind::Other,
        })
    }
}

impl Default for MessageKind {
    fn default() -> Self {
        MessageKind::Text
    }
}

/// Insert shape for one inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    /// Internal user row id (`users.id`, not the Telegram id).
    pub user_id: i64,
    /// Telegram's per-chat message id. Not unique here: transport retries
    /// may log the same message twice and both rows are kept.
    pub message_id: i64,
    pub chat_id: i64,
    pub text: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

/// A persisted message row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub user_id: i64,
    pub message_id: i64,
    pub chat_id: i64,
    pub text: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_display_roundtrip() {
        for kind in [
            MessageKind::Text,
            MessageKind::Photo,
            MessageKind::Document,
            MessageKind::Sticker,
            MessageKind::Voice,
            MessageKind::Other,
        ] {
            let parsed: MessageKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_message_kind_unknown_tag_parses_as_other() {
        let parsed: MessageKind = "video_note".parse().unwrap();
        assert_eq!(parsed, MessageKind::Other);
    }

    #[test]
    fn test_message_kind_default_is_text() {
        assert_eq!(MessageKind::default(), MessageKind::Text);
    }

    #[test]
    fn test_message_serde_roundtrip() {
        let msg = Message {
            id: 7,
            user_id: 1,
            message_id: 1001,
            chat_id: 42,
            text: "hi".to_string(),
            kind: MessageKind::Text,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"kind\":\"text\""));
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.text, "hi");
    }
}
