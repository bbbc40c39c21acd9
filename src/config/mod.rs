//! Configuration module for the homework bot.
//!
//! Handles loading of the required credentials from the environment
//! and the built-in poller settings.

mod settings;

pub use settings::{
    ConfigError, Credentials, PRACTICUM_TOKEN_VAR, PollerSettings, TELEGRAM_CHAT_ID_VAR,
    TELEGRAM_TOKEN_VAR,
};

/// Practicum homework statuses endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Delay between poll cycles in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;
