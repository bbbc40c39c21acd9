//! Response validation and status formatting.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::error;

use super::PracticumError;

/// Key holding the homework list in an API response.
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Key holding the server timestamp in an API response.
pub const CURRENT_DATE_KEY: &str = "current_date";

const HOMEWORK_NAME_KEY: &str = "homework_name";
const STATUS_KEY: &str = "status";

/// Review status of a homework submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    /// Reviewed and accepted.
    Approved,
    /// Taken for review.
    Reviewing,
    /// Reviewed with remarks.
    Rejected,
}

impl HomeworkStatus {
    /// All known statuses.
    pub const ALL: [Self; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// Status code as reported by the API.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat.
    #[must_use]
    pub const fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = PracticumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| PracticumError::UnknownStatus(s.to_owned()))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Checks the shape of an API response and returns its homework list.
///
/// The list itself may be empty; items are not inspected here.
///
/// # Errors
///
/// Returns an error if the body is empty, not an object, or lacks a
/// list-valued `homeworks` field.
pub fn check_response(response: &Value) -> Result<&[Value], PracticumError> {
    let result = match response {
        Value::Object(map) if map.is_empty() => Err(PracticumError::EmptyResponse),
        Value::Object(map) => match map.get(HOMEWORKS_KEY) {
            Some(Value::Array(homeworks)) => Ok(homeworks.as_slice()),
            Some(_) => Err(PracticumError::WrongFieldType(HOMEWORKS_KEY)),
            None => Err(PracticumError::MissingKey(HOMEWORKS_KEY)),
        },
        _ => Err(PracticumError::NotAnObject),
    };

    if let Err(e) = &result {
        error!("Invalid API response: {}", e);
    }

    result
}

/// Extracts the server timestamp from an API response.
#[must_use]
pub fn current_date(response: &Value) -> Option<i64> {
    response.get(CURRENT_DATE_KEY).and_then(Value::as_i64)
}

/// Builds the notification text for a single homework item.
///
/// # Errors
///
/// Returns an error if the name or status is missing or malformed, or if
/// the status is not one of the known codes.
pub fn parse_status(homework: &Value) -> Result<String, PracticumError> {
    let result = required_str(homework, HOMEWORK_NAME_KEY).and_then(|name| {
        let status: HomeworkStatus = required_str(homework, STATUS_KEY)?.parse()?;
        Ok(format!(
            "Изменился статус проверки работы \"{name}\". {}",
            status.verdict()
        ))
    });

    if let Err(e) = &result {
        error!("Invalid homework item: {}", e);
    }

    result
}

fn required_str<'a>(item: &'a Value, key: &'static str) -> Result<&'a str, PracticumError> {
    match item.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(PracticumError::WrongFieldType(key)),
        None => Err(PracticumError::MissingKey(key)),
    }
}
