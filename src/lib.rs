//! Homework Status Bot Library
//!
//! Polls the Practicum homework API and relays review status changes
//! to a Telegram chat.
//!
//! This crate provides the core functionality for:
//! - Loading the required credentials from the environment
//! - Fetching and validating homework status responses
//! - Formatting status verdicts into chat messages
//! - Running the fixed-interval poll loop

pub mod config;
pub mod logging;
pub mod practicum;
pub mod scheduler;
pub mod telegram;
