//! Credentials and poller settings.

use std::fmt;
use std::time::Duration;

use super::{DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TELEGRAM_API_BASE};

/// Environment variable holding the Practicum OAuth token.
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";

/// Environment variable holding the target chat id.
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Secrets required to run the bot.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth token for the Practicum homework API.
    pub practicum_token: String,

    /// Telegram Bot API token.
    pub telegram_token: String,

    /// Chat that receives notifications.
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Creates credentials from explicit values.
    #[must_use]
    pub fn new(
        practicum_token: impl Into<String>,
        telegram_token: impl Into<String>,
        telegram_chat_id: impl Into<String>,
    ) -> Self {
        Self {
            practicum_token: practicum_token.into(),
            telegram_token: telegram_token.into(),
            telegram_chat_id: telegram_chat_id.into(),
        }
    }

    /// Creates credentials using an arbitrary variable lookup.
    ///
    /// Empty and whitespace-only values count as missing.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar(name))
        };

        Ok(Self {
            practicum_token: require(PRACTICUM_TOKEN_VAR)?,
            telegram_token: require(TELEGRAM_TOKEN_VAR)?,
            telegram_chat_id: require(TELEGRAM_CHAT_ID_VAR)?,
        })
    }
}

// Tokens never end up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Poller settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerSettings {
    /// Homework statuses endpoint.
    pub endpoint: String,

    /// Base URL of the Telegram Bot API.
    pub telegram_api_base: String,

    /// Delay between poll cycles.
    pub poll_interval: Duration,

    /// Timeout applied to every outbound HTTP request.
    pub request_timeout: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_owned(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl PollerSettings {
    /// Overrides the homework statuses endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the Telegram Bot API base URL.
    #[must_use]
    pub fn with_telegram_api_base(mut self, base: impl Into<String>) -> Self {
        self.telegram_api_base = base.into();
        self
    }

    /// Overrides the delay between poll cycles.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
}

impl ConfigError {
    /// Name of the variable that caused the error.
    #[must_use]
    pub const fn var_name(&self) -> &'static str {
        match self {
            Self::MissingEnvVar(name) => name,
        }
    }
}
