//! Homework status poll loop.
//!
//! Each cycle runs the same sequence:
//! 1. Fetch statuses updated since the watermark
//! 2. Validate the response shape
//! 3. If the list is non-empty, notify about the first item only
//! 4. Advance the watermark to the server's `current_date`
//!
//! Any failure in steps 1-3 becomes a single failure notification and the
//! loop carries on after the usual delay. Notification failures are logged
//! and never abort a cycle.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::PollState;
use crate::practicum::{self, HomeworkSource, PracticumError};
use crate::telegram::Notifier;

/// Messages that can be sent to the poller.
#[derive(Debug, Clone)]
pub enum SchedulerMessage {
    /// Stop after the current cycle.
    Shutdown,
}

/// Result of a single poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A status change was found; carries the message sent to the chat.
    Notified(String),
    /// The response held no new statuses.
    NoUpdates,
    /// The cycle failed; carries the failure message sent to the chat.
    Failed(String),
}

/// What a successful check produced.
struct CheckReport {
    message: Option<String>,
    current_date: Option<i64>,
}

/// Polls the homework API and relays status changes to the chat.
pub struct StatusPoller<S, N> {
    source: S,
    notifier: N,
    state: PollState,
    poll_interval: Duration,
}

impl<S: HomeworkSource, N: Notifier> StatusPoller<S, N> {
    /// Creates a poller with the watermark at zero.
    #[must_use]
    pub fn new(source: S, notifier: N, poll_interval: Duration) -> Self {
        Self {
            source,
            notifier,
            state: PollState::new(),
            poll_interval,
        }
    }

    /// Runs cycles until a shutdown message arrives or the channel closes.
    pub async fn run(&mut self, mut rx: mpsc::Receiver<SchedulerMessage>) {
        info!(
            "Homework poller started, interval {}s",
            self.poll_interval.as_secs()
        );

        loop {
            self.run_cycle().await;

            tokio::select! {
                () = tokio::time::sleep(self.poll_interval) => {}
                msg = rx.recv() => {
                    match msg {
                        Some(SchedulerMessage::Shutdown) | None => {
                            info!("Poller shutting down");
                            break;
                        }
                    }
                }
            }
        }

        info!(
            "Poller stopped after {} cycles ({} failed, {} notifications sent)",
            self.state.total_cycles(),
            self.state.failed_cycles,
            self.state.notifications_sent
        );
    }

    /// Runs a single poll cycle, reporting any failure to the chat.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.check().await {
            Ok(report) => {
                let outcome = if let Some(message) = report.message {
                    self.notify(&message).await;
                    CycleOutcome::Notified(message)
                } else {
                    debug!("No new homework statuses");
                    CycleOutcome::NoUpdates
                };

                match report.current_date {
                    Some(current_date) => self.state.advance(current_date),
                    None => warn!(
                        "Response has no usable current_date, keeping watermark {}",
                        self.state.watermark
                    ),
                }

                self.state.record_cycle(true);
                outcome
            }
            Err(e) => {
                error!("Poll cycle failed: {}", e);
                let message = failure_message(&e);
                self.notify(&message).await;
                self.state.record_cycle(false);
                CycleOutcome::Failed(message)
            }
        }
    }

    async fn check(&self) -> Result<CheckReport, PracticumError> {
        let response = self.source.fetch_statuses(self.state.watermark).await?;
        let homeworks = practicum::check_response(&response)?;

        let message = match homeworks.first() {
            Some(latest) => Some(practicum::parse_status(latest)?),
            None => None,
        };

        Ok(CheckReport {
            message,
            current_date: practicum::current_date(&response),
        })
    }

    async fn notify(&mut self, message: &str) {
        if send_notification(&self.notifier, message).await {
            self.state.record_notification();
        }
    }

    /// Gets the loop state.
    #[must_use]
    pub const fn state(&self) -> &PollState {
        &self.state
    }

    /// Gets the homework source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Gets the notifier.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<S, N> std::fmt::Debug for StatusPoller<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPoller")
            .field("state", &self.state)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

/// Sends a message, logging the outcome. Returns whether it was delivered.
pub async fn send_notification<N: Notifier + ?Sized>(notifier: &N, message: &str) -> bool {
    match notifier.send_message(message).await {
        Ok(()) => {
            info!("Message sent to Telegram: {}", message);
            true
        }
        Err(e) => {
            error!("Failed to send message to Telegram: {}", e);
            false
        }
    }
}

/// Sends `Shutdown` to the poller once `signal` resolves.
///
/// If the signal cannot be listened for, the sender is held for the life of
/// the task and the poller keeps running.
pub async fn shutdown_on<F>(signal: F, tx: mpsc::Sender<SchedulerMessage>)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Received shutdown signal");
    let _ = tx.send(SchedulerMessage::Shutdown).await;
}

/// Chat message for a failed poll cycle.
#[must_use]
pub fn failure_message(err: &PracticumError) -> String {
    format!("Сбой в работе программы: {err}")
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::scheduler::fakes::{FakeNotifier, FakeSource};

    fn poller(responses: Vec<Result<Value, PracticumError>>) -> StatusPoller<FakeSource, FakeNotifier> {
        StatusPoller::new(
            FakeSource::with(responses),
            FakeNotifier::default(),
            Duration::from_millis(10),
        )
    }

    #[tokio::test]
    async fn test_empty_list_advances_watermark_silently() {
        let mut poller = poller(vec![Ok(json!({"homeworks": [], "current_date": 1_700_000_000}))]);

        assert_eq!(poller.run_cycle().await, CycleOutcome::NoUpdates);
        assert_eq!(poller.state().watermark, 1_700_000_000);
        assert!(poller.notifier().sent().is_empty());
    }

    #[tokio::test]
    async fn test_new_status_sends_one_notification() {
        let mut poller = poller(vec![Ok(json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 10
        }))]);

        poller.run_cycle().await;

        assert_eq!(
            poller.notifier().sent(),
            vec![
                "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!"
                    .to_owned()
            ]
        );
        assert_eq!(poller.state().watermark, 10);
        assert_eq!(poller.state().notifications_sent, 1);
    }

    #[tokio::test]
    async fn test_only_first_item_is_reported() {
        let mut poller = poller(vec![Ok(json!({
            "homeworks": [
                {"homework_name": "newest", "status": "reviewing"},
                {"homework_name": "older", "status": "rejected"}
            ],
            "current_date": 10
        }))]);

        poller.run_cycle().await;

        let sent = poller.notifier().sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("\"newest\""));
    }

    #[tokio::test]
    async fn test_missing_homeworks_reports_failure_and_keeps_watermark() {
        let mut poller = poller(vec![
            Ok(json!({"homeworks": [], "current_date": 5})),
            Ok(json!({"current_date": 99})),
            Ok(json!({"homeworks": [], "current_date": 7})),
        ]);

        poller.run_cycle().await;
        let outcome = poller.run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::Failed(ref m) if m.contains("homeworks")));
        assert_eq!(poller.state().watermark, 5);

        // Polling continues from the last good watermark.
        poller.run_cycle().await;
        assert_eq!(poller.source.requested(), vec![0, 5, 5]);
        assert_eq!(poller.state().watermark, 7);
        assert_eq!(poller.notifier().sent().len(), 1);
        assert_eq!(poller.state().failed_cycles, 1);
    }

    #[tokio::test]
    async fn test_bad_status_becomes_failure_notification() {
        let mut poller = poller(vec![
            Err(PracticumError::BadStatus(500)),
            Err(PracticumError::BadStatus(500)),
        ]);

        poller.run_cycle().await;
        poller.run_cycle().await;

        let sent = poller.notifier().sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], "Сбой в работе программы: Homework API returned HTTP 500");
    }

    #[tokio::test]
    async fn test_unknown_status_becomes_failure_notification() {
        let mut poller = poller(vec![Ok(json!({
            "homeworks": [{"homework_name": "hw1", "status": "lost"}],
            "current_date": 10
        }))]);

        let outcome = poller.run_cycle().await;

        assert!(matches!(outcome, CycleOutcome::Failed(ref m) if m.contains("lost")));
        assert_eq!(poller.state().watermark, 0);
    }

    #[tokio::test]
    async fn test_missing_current_date_keeps_watermark() {
        let mut poller = poller(vec![
            Ok(json!({"homeworks": [], "current_date": 3})),
            Ok(json!({"homeworks": []})),
        ]);

        poller.run_cycle().await;
        assert_eq!(poller.run_cycle().await, CycleOutcome::NoUpdates);
        assert_eq!(poller.state().watermark, 3);
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_abort_cycle() {
        let mut poller = StatusPoller::new(
            FakeSource::with(vec![Ok(json!({
                "homeworks": [{"homework_name": "hw1", "status": "rejected"}],
                "current_date": 10
            }))]),
            FakeNotifier::failing(),
            Duration::from_millis(10),
        );

        assert!(matches!(poller.run_cycle().await, CycleOutcome::Notified(_)));
        assert_eq!(poller.state().watermark, 10);
        assert_eq!(poller.state().notifications_sent, 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mut poller = poller(vec![Ok(json!({"homeworks": [], "current_date": 1}))]);
        let (tx, rx) = mpsc::channel(1);
        tx.send(SchedulerMessage::Shutdown).await.unwrap();

        poller.run(rx).await;

        assert_eq!(poller.state().total_cycles(), 1);
        assert_eq!(poller.state().watermark, 1);
    }

    #[tokio::test]
    async fn test_run_keeps_polling_until_channel_closes() {
        let mut poller = poller(vec![
            Err(PracticumError::EmptyResponse),
            Ok(json!({"homeworks": [], "current_date": 2})),
        ]);
        let (tx, rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(35)).await;
            drop(tx);
        });
        poller.run(rx).await;
        handle.await.unwrap();

        assert!(poller.state().total_cycles() >= 2);
        assert_eq!(poller.state().failed_cycles, 1);
    }

    #[tokio::test]
    async fn test_shutdown_on_signal_sends_shutdown() {
        let (tx, mut rx) = mpsc::channel(1);

        shutdown_on(async { Ok(()) }, tx).await;

        assert!(matches!(rx.recv().await, Some(SchedulerMessage::Shutdown)));
    }

    #[tokio::test]
    async fn test_shutdown_on_failed_signal_keeps_poller_running() {
        let (tx, mut rx) = mpsc::channel(1);

        let handle = tokio::spawn(shutdown_on(
            async { Err(std::io::Error::other("no signal handler")) },
            tx,
        ));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(rx.try_recv().unwrap_err(), mpsc::error::TryRecvError::Empty);
        handle.abort();
    }
}
