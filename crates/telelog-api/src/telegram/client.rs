//! Long-polling Telegram Bot API client.
//!
//! The bot token is wrapped in [`secrecy::SecretString`] and only exposed
//! when building request URLs; reqwest errors are stripped of their URL
//! before surfacing so the token never reaches logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use super::types::{ApiEnvelope, BotIdentity, SendMessage, Update};

/// Errors from Bot API calls.
#[derive(Debug, Error)]
pub enum BotApiError {
    #[error("http error: {0}")]
    Http(reqwest::Error),

    /// The API answered `ok: false`.
    #[error("telegram api error: {0}")]
    Api(String),
}

/// Telegram Bot API client over HTTPS.
pub struct BotApi {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl BotApi {
    /// Create a new client for the given bot token.
    pub fn new(token: SecretString) -> Self {
        // Total request timeout sits above the long-poll window so a full
        // getUpdates wait is not cut short client-side.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            token,
            base_url: "https://api.telegram.org".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            method
        )
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
    ) -> Result<T, BotApiError> {
        let envelope: ApiEnvelope<T> = self
            .client
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await
            .map_err(|e| BotApiError::Http(e.without_url()))?
            .json()
            .await
            .map_err(|e| BotApiError::Http(e.without_url()))?;

        if envelope.ok {
            envelope
                .result
                .ok_or_else(|| BotApiError::Api(format!("{method}: ok but missing result")))
        } else {
            Err(BotApiError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| format!("{method}: unspecified error")),
            ))
        }
    }

    /// Verify the token and fetch the bot's own identity.
    pub async fn get_me(&self) -> Result<BotIdentity, BotApiError> {
        self.call("getMe", &json!({})).await
    }

    /// Long-poll for updates past `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, BotApiError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    /// Send a text reply (optionally with parse mode / inline keyboard).
    pub async fn send_message(&self, message: &SendMessage) -> Result<(), BotApiError> {
        // The echoed Message payload is not used.
        let _: serde_json::Value = self.call("sendMessage", message).await?;
        Ok(())
    }

    /// Acknowledge a callback query so the client stops its spinner.
    pub async fn answer_callback_query(&self, callback_id: &str) -> Result<(), BotApiError> {
        let _: bool = self
            .call("answerCallbackQuery", &json!({"callback_query_id": callback_id}))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url_embeds_token() {
        let api = BotApi::new(SecretString::from("123:abc".to_string()))
            .with_base_url("http://localhost:9000".to_string());
        assert_eq!(
            api.method_url("getMe"),
            "http://localhost:9000/bot123:abc/getMe"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = BotApiError::Api("Unauthorized".to_string());
        assert_eq!(err.to_string(), "telegram api error: Unauthorized");
    }
}
