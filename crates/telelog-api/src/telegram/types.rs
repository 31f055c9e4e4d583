//! Wire types for the subset of the Telegram Bot API this bot uses.
//!
//! Only the fields the dispatcher reads are modeled; everything else in an
//! update is ignored by serde. Media payloads are kept as raw JSON markers
//! because the bot only needs their presence for kind classification.

use serde::{Deserialize, Serialize};

use telelog_types::message::MessageKind;
use telelog_types::user::TelegramUser;

/// Generic `{ok, result, description}` envelope every Bot API call returns.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One long-poll update. Exactly one of the payload fields is set.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<WireMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<WireUser>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Option<serde_json::Value>,
    #[serde(default)]
    pub document: Option<serde_json::Value>,
    #[serde(default)]
    pub sticker: Option<serde_json::Value>,
    #[serde(default)]
    pub voice: Option<serde_json::Value>,
}

impl WireMessage {
    /// Classify the message for the `message_type` column.
    pub fn kind(&self) -> MessageKind {
        if self.photo.is_some() {
            MessageKind::Photo
        } else if self.document.is_some() {
            MessageKind::Document
        } else if self.sticker.is_some() {
            MessageKind::Sticker
        } else if self.voice.is_some() {
            MessageKind::Voice
        } else if self.text.is_some() {
            MessageKind::Text
        } else {
            MessageKind::Other
        }
    }

    /// Loggable content: the text, else the caption, else a kind marker.
    pub fn content(&self) -> String {
        if let Some(text) = &self.text {
            text.clone()
        } else if let Some(caption) = &self.caption {
            caption.clone()
        } else {
            format!("[{}]", self.kind())
        }
    }
}

/// The sender of a message or callback query.
#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl WireUser {
    /// The persistence-layer descriptor for this sender.
    pub fn profile(&self) -> TelegramUser {
        TelegramUser {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            language_code: self.language_code.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A press on an inline keyboard button.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: WireUser,
    #[serde(default)]
    pub data: Option<String>,
    /// The message the keyboard was attached to; carries the chat to reply into.
    #[serde(default)]
    pub message: Option<WireMessage>,
}

/// The bot's own identity, from `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Outbound payloads
// ---------------------------------------------------------------------------

/// Payload for `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendMessage {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
        }
    }

    pub fn with_parse_mode(mut self, mode: &str) -> Self {
        self.parse_mode = Some(mode.to_string());
        self
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}
