//! Standalone checker for saved homework API responses.
//!
//! Runs the same validation and formatting as the bot over a JSON file
//! and prints the message that would be sent to the chat.

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;

use homework_status_bot::practicum::{check_response, current_date, parse_status};

/// Homework API response checker.
#[derive(Parser, Debug)]
#[command(name = "check_response")]
#[command(about = "Validates a saved Practicum homework statuses response")]
#[command(version)]
struct Args {
    /// Path to the JSON response file to check.
    #[arg(short, long, default_value = "response.json")]
    file: String,

    /// Check every homework item, not only the one the bot reports.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    check_file(&args.file, args.verbose)
}

fn check_file(path: &str, verbose: bool) -> ExitCode {
    println!("Checking: {path}\n");

    let response: Value = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(v) => v,
        Err(e) => {
            eprintln!("✗ Failed to load response: {e}");
            return ExitCode::FAILURE;
        }
    };

    let homeworks = match check_response(&response) {
        Ok(h) => h,
        Err(e) => {
            println!("✗ Invalid response: {e}");
            return ExitCode::FAILURE;
        }
    };

    match current_date(&response) {
        Some(ts) => println!("current_date: {ts}"),
        None => println!("⚠ Warning: no integer current_date, the watermark would not advance"),
    }
    println!("Homework items: {}\n", homeworks.len());

    if verbose {
        for (i, item) in homeworks.iter().enumerate() {
            match parse_status(item) {
                Ok(message) => println!("  [{i}] ✓ {message}"),
                Err(e) => println!("  [{i}] ✗ {e}"),
            }
        }
        println!();
    }

    match homeworks.first().map(parse_status) {
        None => {
            println!("✓ No new statuses, nothing would be sent");
            ExitCode::SUCCESS
        }
        Some(Ok(message)) => {
            println!("✓ Would send:\n  {message}");
            ExitCode::SUCCESS
        }
        Some(Err(e)) => {
            println!("✗ Latest item is invalid: {e}");
            ExitCode::FAILURE
        }
    }
}
