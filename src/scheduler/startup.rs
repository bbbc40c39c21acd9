//! Poller startup.
//!
//! Credentials are checked before anything talks to the homework API. A
//! missing credential is reported to the chat once and no poller is built.

use std::time::Duration;

use thiserror::Error;
use tracing::error;

use super::{StatusPoller, send_notification};
use crate::config::{ConfigError, Credentials, TELEGRAM_CHAT_ID_VAR, TELEGRAM_TOKEN_VAR};
use crate::practicum::{HomeworkSource, PracticumError};
use crate::telegram::{Notifier, TelegramError};

/// Errors that prevent the poller from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create homework API client: {0}")]
    Source(#[from] PracticumError),

    #[error("Failed to create Telegram client: {0}")]
    Notifier(#[from] TelegramError),
}

/// Loads credentials through `lookup` and builds the poller.
///
/// `make_source` receives the Practicum token; `make_notifier` receives the
/// bot token and chat id. When a credential is missing, the notifier is built
/// from whatever values exist, one message naming the variable is sent, and
/// `make_source` is never called.
pub async fn start<F, S, N>(
    lookup: F,
    make_source: impl FnOnce(&str) -> Result<S, PracticumError>,
    make_notifier: impl FnOnce(&str, &str) -> Result<N, TelegramError>,
    poll_interval: Duration,
) -> Result<StatusPoller<S, N>, StartupError>
where
    F: Fn(&str) -> Option<String>,
    S: HomeworkSource,
    N: Notifier,
{
    let credentials = match Credentials::from_lookup(&lookup) {
        Ok(credentials) => credentials,
        Err(e) => {
            let token = lookup(TELEGRAM_TOKEN_VAR).unwrap_or_default();
            let chat_id = lookup(TELEGRAM_CHAT_ID_VAR).unwrap_or_default();
            match make_notifier(&token, &chat_id) {
                Ok(notifier) => report_startup_failure(&notifier, &e).await,
                Err(build_err) => error!("Cannot report missing credential: {}", build_err),
            }
            return Err(e.into());
        }
    };

    let notifier = make_notifier(&credentials.telegram_token, &credentials.telegram_chat_id)?;
    let source = make_source(&credentials.practicum_token)?;

    Ok(StatusPoller::new(source, notifier, poll_interval))
}

/// Reports a startup configuration failure to the chat.
pub async fn report_startup_failure<N: Notifier + ?Sized>(notifier: &N, err: &ConfigError) {
    let message = missing_credential_message(err);
    error!("CRITICAL: {}", message);
    send_notification(notifier, &message).await;
}

/// Chat message for a missing credential.
#[must_use]
pub fn missing_credential_message(err: &ConfigError) -> String {
    format!("Отсутствует переменная окружения: {}", err.var_name())
}
