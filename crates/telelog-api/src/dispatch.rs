//! Update dispatcher: routes inbound Telegram updates to handlers.
//!
//! Each handler talks to storage only through the `LedgerService`. Handler
//! failures are logged and answered with a generic apology; storage details
//! never reach the chat.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, warn};

use telelog_core::repository::message::MessageRepository;
use telelog_core::repository::session::SessionRepository;
use telelog_core::repository::user::UserRepository;
use telelog_core::service::ledger::LedgerService;
use telelog_types::config::BotConfig;
use telelog_types::message::Message;
use telelog_types::user::{TelegramUser, User, UserStats};

use crate::telegram::client::BotApi;
use crate::telegram::types::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, SendMessage, Update, WireMessage,
};

/// The command set the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Stats,
    Messages,
}

impl Command {
    /// Parse a leading bot command, tolerating the `@botname` suffix
    /// Telegram appends in group chats. Returns `None` for non-commands
    /// and unknown commands alike.
    pub fn parse(text: &str) -> Option<Command> {
        let rest = text.trim().strip_prefix('/')?;
        let name = rest
            .split_whitespace()
            .next()?
            .split('@')
            .next()
            .unwrap_or_default();
        match name {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "stats" => Some(Command::Stats),
            "messages" => Some(Command::Messages),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Stats => "stats",
            Command::Messages => "messages",
        }
    }
}

/// Routes updates from the long-poll loop to the handlers below.
pub struct Dispatcher<U: UserRepository, M: MessageRepository, S: SessionRepository> {
    service: Arc<LedgerService<U, M, S>>,
    api: BotApi,
    config: BotConfig,
}

impl<U: UserRepository, M: MessageRepository, S: SessionRepository> Dispatcher<U, M, S> {
    pub fn new(service: Arc<LedgerService<U, M, S>>, api: BotApi, config: BotConfig) -> Self {
        Self {
            service,
            api,
            config,
        }
    }

    /// Long-poll loop. Returns on ctrl-c.
    pub async fn run(&self) -> anyhow::Result<()> {
        let me = self.api.get_me().await?;
        info!(
            bot_id = me.id,
            username = me.username.as_deref().unwrap_or("?"),
            "bot authorized, polling for updates"
        );

        let mut offset = 0i64;
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received");
                    return Ok(());
                }
                batch = self.api.get_updates(offset, self.config.poll_timeout_secs) => {
                    match batch {
                        Ok(updates) => {
                            for update in updates {
                                offset = offset.max(update.update_id + 1);
                                self.handle_update(update).await;
                            }
                        }
                        Err(e) => {
                            // Pace the loop so a dead network does not spin it hot.
                            warn!(error = %e, "getUpdates failed");
                            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                        }
                    }
                }
            }
        }
    }

    /// Handle one update, answering failures with a generic apology.
    pub async fn handle_update(&self, update: Update) {
        let update_id = update.update_id;

        if let Some(message) = update.message {
            let Some(from) = message.from.clone() else {
                debug!(update_id, "message without sender, skipping");
                return;
            };
            if from.is_bot {
                debug!(update_id, "ignoring message from a bot");
                return;
            }
            let chat_id = message.chat.id;
            if let Err(e) = self.route_message(&from.profile(), &message).await {
                error!(update_id, error = %e, "message handler failed");
                self.send_generic_error(chat_id).await;
            }
        } else if let Some(cbq) = update.callback_query {
            if let Err(e) = self.route_callback(&cbq).await {
                let chat_id = cbq.message.map(|m| m.chat.id).unwrap_or(cbq.from.id);
                error!(update_id, error = %e, "callback handler failed");
                self.send_generic_error(chat_id).await;
            }
        } else {
            debug!(update_id, "update carries no handled payload");
        }
    }

    async fn route_message(
        &self,
        profile: &TelegramUser,
        message: &WireMessage,
    ) -> anyhow::Result<()> {
        let chat_id = message.chat.id;

        if let Some(command) = message.text.as_deref().and_then(Command::parse) {
            return self.run_command(command, profile, chat_id).await;
        }
        if message.text.as_deref().is_some_and(|t| t.starts_with('/')) {
            debug!(chat_id, "unknown command, ignoring");
            return Ok(());
        }
        self.handle_content(profile, message).await
    }

    async fn route_callback(&self, cbq: &CallbackQuery) -> anyhow::Result<()> {
        self.api.answer_callback_query(&cbq.id).await?;

        // Private chats share the user's id, which covers the rare case of
        // a callback arriving without its source message.
        let chat_id = cbq.message.as_ref().map(|m| m.chat.id).unwrap_or(cbq.from.id);
        let profile = cbq.from.profile();

        match cbq.data.as_deref() {
            Some("stats") => self.run_command(Command::Stats, &profile, chat_id).await,
            Some("messages") => self.run_command(Command::Messages, &profile, chat_id).await,
            Some("help") => self.run_command(Command::Help, &profile, chat_id).await,
            other => {
                debug!(chat_id, data = ?other, "unknown callback data, ignoring");
                Ok(())
            }
        }
    }

    async fn run_command(
        &self,
        command: Command,
        profile: &TelegramUser,
        chat_id: i64,
    ) -> anyhow::Result<()> {
        match command {
            Command::Start => self.handle_start(profile, chat_id).await,
            Command::Help => self.handle_help(chat_id).await,
            Command::Stats => self.handle_stats(profile, chat_id).await,
            Command::Messages => self.handle_messages(profile, chat_id).await,
        }
    }

    async fn handle_start(&self, profile: &TelegramUser, chat_id: i64) -> anyhow::Result<()> {
        let returning = self.service.load_session(profile.id).await?.is_some();
        self.service.record_contact(profile).await?;
        self.remember_command(profile, chat_id, Command::Start).await?;

        self.api
            .send_message(
                &SendMessage::new(chat_id, welcome_text(profile, returning))
                    .with_parse_mode(&self.config.parse_mode)
                    .with_keyboard(main_menu_keyboard()),
            )
            .await?;
        Ok(())
    }

    async fn handle_help(&self, chat_id: i64) -> anyhow::Result<()> {
        self.api
            .send_message(
                &SendMessage::new(chat_id, HELP_TEXT).with_parse_mode(&self.config.parse_mode),
            )
            .await?;
        Ok(())
    }

    async fn handle_stats(&self, profile: &TelegramUser, chat_id: i64) -> anyhow::Result<()> {
        let text = match self.service.user_stats(profile.id).await? {
            Some((user, stats)) => render_stats(&user, &stats),
            None => "No statistics found. Send a message first!".to_string(),
        };
        self.api
            .send_message(&SendMessage::new(chat_id, text).with_parse_mode(&self.config.parse_mode))
            .await?;
        Ok(())
    }

    async fn handle_messages(&self, profile: &TelegramUser, chat_id: i64) -> anyhow::Result<()> {
        let messages = self
            .service
            .recent_messages(profile.id, self.config.recent_limit)
            .await?;
        let text = if messages.is_empty() {
            "No messages found. Start chatting!".to_string()
        } else {
            render_messages(&messages)
        };
        self.api
            .send_message(&SendMessage::new(chat_id, text).with_parse_mode(&self.config.parse_mode))
            .await?;
        Ok(())
    }

    /// Plain (non-command) message: log it, acknowledge it.
    async fn handle_content(
        &self,
        profile: &TelegramUser,
        message: &WireMessage,
    ) -> anyhow::Result<()> {
        let chat_id = message.chat.id;
        let content = message.content();

        self.service
            .record_message(
                profile,
                chat_id,
                message.message_id,
                content.clone(),
                message.kind(),
            )
            .await?;
        self.service
            .store_session(
                profile.id,
                &json!({"last_command": "message", "chat_id": chat_id}),
            )
            .await?;

        let reply = if is_greeting(&content) {
            format!(
                "👋 Hello {}! Your message is saved. 📊",
                profile.first_name.as_deref().unwrap_or("there")
            )
        } else {
            "✅ Message saved!\n\n💡 Send /stats to see your statistics\n💡 Send /messages to see your recent messages".to_string()
        };
        self.api.send_message(&SendMessage::new(chat_id, reply)).await?;
        Ok(())
    }

    /// Persist which command the user last ran, for turn-to-turn context.
    async fn remember_command(
        &self,
        profile: &TelegramUser,
        chat_id: i64,
        command: Command,
    ) -> anyhow::Result<()> {
        self.service
            .store_session(
                profile.id,
                &json!({"last_command": command.name(), "chat_id": chat_id}),
            )
            .await?;
        Ok(())
    }

    async fn send_generic_error(&self, chat_id: i64) {
        let reply = SendMessage::new(chat_id, "⚠️ Something went wrong, please try again.");
        if let Err(e) = self.api.send_message(&reply).await {
            error!(chat_id, error = %e, "failed to send error reply");
        }
    }
}

// ---------------------------------------------------------------------------
// Reply rendering
// ---------------------------------------------------------------------------

const HELP_TEXT: &str = "*Available Commands:*\n\
/start - Start the bot\n\
/help - Show this help message\n\
/stats - Show your statistics\n\
/messages - Show your recent messages\n\n\
*Features:*\n\
✅ Stores all messages in a SQL database\n\
✅ Tracks user activity\n\
✅ Provides usage statistics\n\
✅ Shows message history";

fn welcome_text(profile: &TelegramUser, returning: bool) -> String {
    let greeting = if returning {
        "Welcome back to Telelog!"
    } else {
        "Welcome to Telelog!"
    };
    format!(
        "👋 Hello {}!\n\n{}\nI'm logging your messages to the database.\n\nUse the buttons below to explore:",
        profile.display_name(),
        greeting
    )
}

fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::new("📊 My Stats", "stats")],
            vec![InlineKeyboardButton::new("💬 Recent Messages", "messages")],
            vec![InlineKeyboardButton::new("❓ Help", "help")],
        ],
    }
}

fn render_stats(user: &User, stats: &UserStats) -> String {
    let mut text = format!(
        "*Your Statistics:* 📊\n\n👤 User ID: `{}`\n📝 Username: @{}\n📧 Messages Sent: {}\n📅 First Seen: {}",
        user.telegram_id,
        user.username.as_deref().unwrap_or("N/A"),
        stats.message_count,
        user.created_at.format("%Y-%m-%d %H:%M:%S"),
    );
    if let Some(last) = stats.last_message_at {
        text.push_str(&format!("\n🕐 Last Message: {}", last.format("%Y-%m-%d %H:%M:%S")));
    }
    text.push_str(&format!(
        "\n✅ Status: {}",
        if user.is_active { "Active" } else { "Inactive" }
    ));
    text
}

/// Render a recent-messages reply, oldest first, previews capped at 50 chars.
fn render_messages(messages: &[Message]) -> String {
    let mut text = "*Your Recent Messages:*\n\n".to_string();
    for msg in messages.iter().rev() {
        let time = msg.created_at.format("%H:%M:%S");
        let preview: String = if msg.text.chars().count() > 50 {
            let head: String = msg.text.chars().take(50).collect();
            format!("{head}...")
        } else {
            msg.text.clone()
        };
        text.push_str(&format!("🕐 {time} - {preview}\n"));
    }
    text
}

fn is_greeting(text: &str) -> bool {
    matches!(text.trim().to_lowercase().as_str(), "hello" | "hi" | "hey")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use telelog_types::message::MessageKind;

    #[test]
    fn test_command_parse_known_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("/stats"), Some(Command::Stats));
        assert_eq!(Command::parse("/messages"), Some(Command::Messages));
    }

    #[test]
    fn test_command_parse_with_bot_suffix_and_args() {
        assert_eq!(Command::parse("/stats@telelog_bot"), Some(Command::Stats));
        assert_eq!(Command::parse("/start welcome"), Some(Command::Start));
    }

    #[test]
    fn test_command_parse_rejects_non_commands() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse("/frobnicate"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("/"), None);
    }

    #[test]
    fn test_is_greeting_case_insensitive() {
        assert!(is_greeting("Hello"));
        assert!(is_greeting(" HI "));
        assert!(!is_greeting("goodbye"));
    }

    fn msg(id: i64, text: &str, at: chrono::DateTime<Utc>) -> Message {
        Message {
            id,
            user_id: 1,
            message_id: id,
            chat_id: 42,
            text: text.to_string(),
            kind: MessageKind::Text,
            created_at: at,
        }
    }

    #[test]
    fn test_render_messages_oldest_first() {
        let base = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        // Input arrives newest-first, as recent_messages returns it.
        let messages = vec![
            msg(3, "bye", base + Duration::seconds(2)),
            msg(2, "how are you", base + Duration::seconds(1)),
        ];
        let text = render_messages(&messages);
        let bye_pos = text.find("bye").unwrap();
        let how_pos = text.find("how are you").unwrap();
        assert!(how_pos < bye_pos, "older message should render first");
    }

    #[test]
    fn test_render_messages_truncates_long_previews() {
        let long = "x".repeat(80);
        let text = render_messages(&[msg(1, &long, Utc::now())]);
        assert!(text.contains(&format!("{}...", "x".repeat(50))));
        assert!(!text.contains(&"x".repeat(51)));
    }

    #[test]
    fn test_render_stats_includes_count_and_status() {
        let now = Utc::now();
        let user = User {
            id: 1,
            telegram_id: 42,
            username: Some("ana".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: None,
            language_code: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let stats = UserStats {
            message_count: 3,
            first_message_at: Some(now),
            last_message_at: Some(now),
        };
        let text = render_stats(&user, &stats);
        assert!(text.contains("Messages Sent: 3"));
        assert!(text.contains("@ana"));
        assert!(text.contains("Status: Active"));
    }

    #[test]
    fn test_render_stats_without_messages_omits_last_message_line() {
        let now = Utc::now();
        let user = User {
            id: 1,
            telegram_id: 42,
            username: None,
            first_name: Some("Ana".to_string()),
            last_name: None,
            language_code: None,
            is_active: false,
            created_at: now,
            updated_at: now,
        };
        let text = render_stats(&user, &UserStats::default());
        assert!(text.contains("Messages Sent: 0"));
        assert!(!text.contains("Last Message"));
        assert!(text.contains("Status: Inactive"));
        assert!(text.contains("@N/A"));
    }

    #[test]
    fn test_main_menu_keyboard_has_three_rows() {
        let keyboard = main_menu_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 3);
        let data: Vec<&str> = keyboard
            .inline_keyboard
            .iter()
            .map(|row| row[0].callback_data.as_str())
            .collect();
        assert_eq!(data, vec!["stats", "messages", "help"]);
    }
}
