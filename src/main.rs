//! Homework Status Bot - Main Entry Point
//!
//! Polls the Practicum homework API and notifies a Telegram chat
//! whenever the review status of the latest submission changes.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info};

use homework_status_bot::config::PollerSettings;
use homework_status_bot::logging::init_logging;
use homework_status_bot::practicum::PracticumClient;
use homework_status_bot::scheduler::{self, SchedulerMessage};
use homework_status_bot::telegram::TelegramBot;

/// Telegram notifier for Practicum homework review statuses.
#[derive(Parser, Debug)]
#[command(name = "homework_bot")]
#[command(about = "Relay Practicum homework review statuses to Telegram")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run a single poll cycle and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let settings = PollerSettings::default();

    let mut poller = scheduler::start(
        |name| std::env::var(name).ok(),
        |token| PracticumClient::new(token, &settings),
        |token, chat_id| TelegramBot::new(token, chat_id, &settings),
        settings.poll_interval,
    )
    .await
    .context("Failed to start homework poller")?;

    info!("Polling {}", poller.source().endpoint());

    if args.once {
        let outcome = poller.run_cycle().await;
        info!("Single cycle finished: {:?}", outcome);
        return Ok(());
    }

    let (poller_tx, poller_rx) = mpsc::channel::<SchedulerMessage>(1);

    tokio::spawn(scheduler::shutdown_on(tokio::signal::ctrl_c(), poller_tx));

    info!("Bot is running. Use Ctrl+C to stop.");
    poller.run(poller_rx).await;

    Ok(())
}
