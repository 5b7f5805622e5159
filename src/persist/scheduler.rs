//! Debounced save scheduling
//!
//! The scheduler only tracks a deadline. The event loop that owns it
//! sleeps until [`SaveScheduler::deadline`] and then asks
//! [`SaveScheduler::take_due`] whether to save. Every request pushes the
//! deadline out by the full idle delay, so a burst of edits produces one
//! save after the burst ends.

use tokio::time::{Duration, Instant};

/// Idle delay used when none is configured
pub const DEFAULT_IDLE_DELAY: Duration = Duration::from_millis(2000);

/// Pending-save timer
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    idle_delay: Duration,
    deadline: Option<Instant>,
}

impl SaveScheduler {
    pub fn new(idle_delay: Duration) -> Self {
        Self {
            idle_delay,
            deadline: None,
        }
    }

    pub fn idle_delay(&self) -> Duration {
        self.idle_delay
    }

    /// Arms the timer for `now + idle_delay`, replacing any pending one.
    ///
    /// Returns `true` if a pending save was superseded.
    pub fn request_save(&mut self, now: Instant) -> bool {
        self.deadline.replace(now + self.idle_delay).is_some()
    }

    /// When the pending save fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the pending save should run at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarms and returns `true` if the pending save is due at `now`.
    ///
    /// The caller must perform the save when this returns `true`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Drops the pending save without running it.
    ///
    /// Returns `true` if one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

impl Default for SaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_DELAY)
    }
}
