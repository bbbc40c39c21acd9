//! In-memory source and notifier used by the scheduler tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::practicum::{HomeworkSource, PracticumError};
use crate::telegram::{Notifier, TelegramError};

/// Source that replays queued responses, then reports no new statuses.
#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<VecDeque<Result<Value, PracticumError>>>,
    requested: Mutex<Vec<i64>>,
}

impl FakeSource {
    pub fn with(responses: Vec<Result<Value, PracticumError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requested: Mutex::default(),
        }
    }

    pub fn requested(&self) -> Vec<i64> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HomeworkSource for FakeSource {
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value, PracticumError> {
        self.requested.lock().unwrap().push(from_date);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(json!({"homeworks": [], "current_date": from_date})))
    }
}

/// Notifier that records every message it is asked to send.
#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<String>>,
    failing: bool,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        self.sent.lock().unwrap().push(text.to_owned());
        if self.failing {
            Err(TelegramError::Rejected("chat not found".to_owned()))
        } else {
            Ok(())
        }
    }
}
