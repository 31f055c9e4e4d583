//! Bot configuration for Telelog.
//!
//! `BotConfig` represents the optional `config.toml` in the data directory.
//! All fields have defaults, so a missing file is a valid configuration.
//! The bot token is deliberately not part of this file; it comes from the
//! environment and is wrapped in a secret type at the API layer.

use serde::{Deserialize, Serialize};

/// Tunable settings for the bot loop and reply rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Long-poll timeout passed to getUpdates, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// How many messages the /messages command shows.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: i64,

    /// Telegram parse_mode for outbound replies ("Markdown" or "HTML").
    #[serde(default = "default_parse_mode")]
    pub parse_mode: String,
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_recent_limit() -> i64 {
    5
}

fn default_parse_mode() -> String {
    "Markdown".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: default_poll_timeout_secs(),
            recent_limit: default_recent_limit(),
            parse_mode: default_parse_mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_config_default_values() {
        let config = BotConfig::default();
        assert_eq!(config.poll_timeout_secs, 30);
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.parse_mode, "Markdown");
    }

    #[test]
    fn test_bot_config_deserialize_empty_uses_defaults() {
        let config: BotConfig = toml::from_str("").unwrap();
        assert_eq!(config.poll_timeout_secs, 30);
        assert_eq!(config.recent_limit, 5);
    }

    #[test]
    fn test_bot_config_deserialize_with_values() {
        let toml_str = r#"
poll_timeout_secs = 10
recent_limit = 20
parse_mode = "HTML"
"#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.poll_timeout_secs, 10);
        assert_eq!(config.recent_limit, 20);
        assert_eq!(config.parse_mode, "HTML");
    }

    #[test]
    fn test_bot_config_serde_roundtrip() {
        let config = BotConfig {
            poll_timeout_secs: 15,
            recent_limit: 3,
            parse_mode: "HTML".to_string(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: BotConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.poll_timeout_secs, 15);
        assert_eq!(parsed.recent_limit, 3);
    }
}
