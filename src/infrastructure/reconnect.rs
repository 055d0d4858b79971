use std::time::Duration;

/// Bounded budget for automatic reconnection attempts.
///
/// Reset on every successful open; saturated by an explicit close so no
/// further automatic connects are scheduled.
#[derive(Debug, Clone)]
pub struct ReconnectBudget {
    attempts: u32,
    max_attempts: u32,
    interval: Duration,
}

impl ReconnectBudget {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            interval,
        }
    }

    /// Attempts consumed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Consume one attempt and return the delay before the next connect,
    /// or `None` when the budget is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.exhausted() {
            return None;
        }
        self.attempts += 1;
        Some(self.interval)
    }

    /// Reset after a successful open or a manual reconnect.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Saturate the budget, suppressing any future automatic reconnect.
    pub fn exhaust(&mut self) {
        self.attempts = self.max_attempts;
    }
}
