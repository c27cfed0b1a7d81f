//! Backoff strategies for shared tier reconnection

use std::time::Duration;

/// Backoff strategy trait
pub trait BackoffStrategy: Send + Sync {
    /// Get the delay for the given attempt number (0-indexed)
    fn delay_for_attempt(&self, attempt: u32) -> Duration;
}

/// Linear backoff - delay increases linearly up to a cap
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    initial_delay: Duration,
    increment: Duration,
    max_delay: Duration,
}

impl LinearBackoff {
    pub fn new(initial_delay: Duration, increment: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            increment,
            max_delay,
        }
    }

    /// `increment`, `2 * increment`, ... capped at `max_delay`
    pub fn stepped(increment: Duration, max_delay: Duration) -> Self {
        Self::new(increment, increment, max_delay)
    }
}

impl BackoffStrategy for LinearBackoff {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.increment
            .checked_mul(attempt)
            .and_then(|step| self.initial_delay.checked_add(step))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}
