//! Practicum homework API module.
//!
//! Fetches homework statuses, validates the response shape and turns a
//! homework item into a notification message.

mod client;
mod response;

pub use client::{HomeworkSource, PracticumClient, PracticumError};
pub use response::{
    CURRENT_DATE_KEY, HOMEWORKS_KEY, HomeworkStatus, check_response, current_date, parse_status,
};
