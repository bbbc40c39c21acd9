//! Telegram Bot API client for outbound notifications.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::PollerSettings;

/// Errors that can occur while sending a Telegram message.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Bot token is not configured")]
    MissingToken,

    #[error("Chat id is not configured")]
    MissingChatId,

    /// Carries the error with its URL stripped; the URL embeds the token.
    #[error("Connection error: {0}")]
    Connection(reqwest::Error),

    #[error("Telegram API returned HTTP {status}: {description}")]
    Http { status: u16, description: String },

    #[error("Telegram API rejected the message: {0}")]
    Rejected(String),
}

/// Something that can deliver a text message to the configured chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a message.
    async fn send_message(&self, text: &str) -> Result<(), TelegramError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        (**self).send_message(text).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Telegram bot bound to a single chat.
pub struct TelegramBot {
    http: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramBot {
    /// Creates a bot that posts to `chat_id`.
    ///
    /// Empty credentials are accepted here and reported on send, so a
    /// startup failure can still be reported when possible.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        settings: &PollerSettings,
    ) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| TelegramError::Connection(e.without_url()))?;

        Ok(Self {
            http,
            api_base: settings.telegram_api_base.trim_end_matches('/').to_owned(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramBot {
    async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        if self.token.trim().is_empty() {
            return Err(TelegramError::MissingToken);
        }
        if self.chat_id.trim().is_empty() {
            return Err(TelegramError::MissingChatId);
        }

        debug!("Sending message to chat {}", self.chat_id);

        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| TelegramError::Connection(e.without_url()))?;

        let status = response.status();
        let body: Option<ApiResponse> = response.json().await.ok();

        if !status.is_success() {
            return Err(TelegramError::Http {
                status: status.as_u16(),
                description: body
                    .and_then(|b| b.description)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        match body {
            Some(ApiResponse { ok: true, .. }) => Ok(()),
            Some(ApiResponse { description, .. }) => Err(TelegramError::Rejected(
                description.unwrap_or_else(|| "sendMessage failed".to_owned()),
            )),
            None => Err(TelegramError::Rejected("unreadable response".to_owned())),
        }
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("api_base", &self.api_base)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}
