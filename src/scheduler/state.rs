//! Poll loop state.

/// State owned by the poll loop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollState {
    /// Timestamp passed as `from_date` on the next request.
    pub watermark: i64,

    /// Cycles that completed without error.
    pub completed_cycles: u64,

    /// Cycles that ended with an error.
    pub failed_cycles: u64,

    /// Notifications delivered successfully.
    pub notifications_sent: u64,
}

impl PollState {
    /// Creates a state with the watermark at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the watermark to the server-reported timestamp.
    pub fn advance(&mut self, current_date: i64) {
        self.watermark = current_date;
    }

    /// Records a cycle outcome.
    pub fn record_cycle(&mut self, success: bool) {
        if success {
            self.completed_cycles += 1;
        } else {
            self.failed_cycles += 1;
        }
    }

    /// Records a delivered notification.
    pub fn record_notification(&mut self) {
        self.notifications_sent += 1;
    }

    /// Total number of cycles run.
    #[must_use]
    pub const fn total_cycles(&self) -> u64 {
        self.completed_cycles + self.failed_cycles
    }
}
