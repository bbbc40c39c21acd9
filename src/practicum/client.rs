//! HTTP client for the Practicum homework statuses API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::PollerSettings;

/// Errors that can occur while fetching or interpreting homework statuses.
#[derive(Debug, Error)]
pub enum PracticumError {
    #[error("Failed to reach the homework API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Homework API returned HTTP {0}")]
    BadStatus(u16),

    #[error("Homework API returned a body that is not JSON: {0}")]
    Decode(String),

    #[error("API response is an empty object")]
    EmptyResponse,

    #[error("API response is not a JSON object")]
    NotAnObject,

    #[error("Missing key \"{0}\"")]
    MissingKey(&'static str),

    #[error("Key \"{0}\" has an unexpected type")]
    WrongFieldType(&'static str),

    #[error("Undocumented homework status: {0}")]
    UnknownStatus(String),
}

/// Source of homework status responses.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetches statuses updated since `from_date` (unix seconds).
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value, PracticumError>;
}

#[async_trait]
impl<T: HomeworkSource + ?Sized> HomeworkSource for Arc<T> {
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value, PracticumError> {
        (**self).fetch_statuses(from_date).await
    }
}

/// Authenticated client for the homework statuses endpoint.
pub struct PracticumClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// Creates a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(token: impl Into<String>, settings: &PollerSettings) -> Result<Self, PracticumError> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            token: token.into(),
        })
    }

    /// Endpoint this client polls.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value, PracticumError> {
        debug!("Requesting homework statuses from_date={}", from_date);

        let response = self
            .http
            .get(&self.endpoint)
            .header(header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| {
                error!("Homework API request failed: {}", e);
                PracticumError::Transport(e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("Homework API returned HTTP {}", status.as_u16());
            return Err(PracticumError::BadStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| PracticumError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
