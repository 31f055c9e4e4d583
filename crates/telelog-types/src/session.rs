//! Chat session state for Telelog.
//!
//! One opaque JSON payload per user, mutated between conversation turns.
//! The dispatcher owns the payload shape; storage treats it as a blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted conversational state for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: i64,
    /// Internal user row id (`users.id`).
    pub user_id: i64,
    /// Opaque structured payload, interpreted only by the dispatcher.
    pub session_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_session_serde_roundtrip() {
        let session = ChatSession {
            id: 1,
            user_id: 3,
            session_data: json!({"last_command": "stats", "turns": 4}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json_str = serde_json::to_string(&session).unwrap();
        let parsed: ChatSession = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.session_data["last_command"], "stats");
        assert_eq!(parsed.session_data["turns"], 4);
    }
}
