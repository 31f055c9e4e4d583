//! Telegram Bot API transport: wire types and the long-polling client.

pub mod client;
pub mod types;
