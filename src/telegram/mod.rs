//! Telegram client wrapper module.
//!
//! Sends notifications to a single chat through the Bot API.

mod client;

pub use client::{Notifier, TelegramBot, TelegramError};
