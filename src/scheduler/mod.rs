//! Homework status polling module.
//!
//! Drives the fetch, validate and notify cycle on a fixed interval.

#[cfg(test)]
mod fakes;
mod runner;
mod startup;
mod state;

pub use runner::{
    CycleOutcome, SchedulerMessage, StatusPoller, failure_message, send_notification, shutdown_on,
};
pub use startup::{StartupError, missing_credential_message, report_startup_failure, start};
pub use state::PollState;
