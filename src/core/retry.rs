//! Capped exponential backoff for reconnecting the stream.

use crate::core::config::ReconnectConfig;
use std::time::Duration;

/// Backoff state for one reconnect cycle
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
    jitter: bool,
    max_attempts: Option<u32>,
    failures: u32,
    retries: u32,
    current: Duration,
}

impl Backoff {
    /// Create backoff state from the reconnect configuration
    pub fn new(config: &ReconnectConfig) -> Self {
        Self {
            initial: config.initial_backoff,
            max: config.max_backoff,
            multiplier: config.multiplier,
            jitter: config.jitter,
            max_attempts: config.max_attempts,
            failures: 0,
            retries: 0,
            current: config.initial_backoff,
        }
    }

    /// Consecutive failed connect attempts since the last reset
    pub fn attempts(&self) -> u32 {
        self.failures
    }

    /// Delays handed out since the last reset
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Count one failed connect attempt.
    pub fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    /// True once `max_attempts` consecutive connect attempts have failed
    pub fn exhausted(&self) -> bool {
        self.max_attempts.is_some_and(|max| self.failures >= max)
    }

    /// Forget previous failures; called after a successful connect.
    pub fn reset(&mut self) {
        self.failures = 0;
        self.retries = 0;
        self.current = self.initial;
    }

    /// Return the delay before the next attempt, growing it for the one after.
    pub fn next_delay(&mut self) -> Duration {
        self.retries = self.retries.saturating_add(1);

        if self.retries > 1 {
            let grown = self.current.as_secs_f64() * self.multiplier;
            // Overflow and NaN both land on the cap
            self.current = Duration::try_from_secs_f64(grown)
                .unwrap_or(self.max)
                .min(self.max);
        }

        if self.jitter {
            let jitter_ms = rand::random::<f64>() * self.current.as_millis() as f64 * 0.1;
            self.current + Duration::from_millis(jitter_ms as u64)
        } else {
            self.current
        }
    }
}
