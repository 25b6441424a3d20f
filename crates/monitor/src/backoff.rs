//! Poll scheduling with exponential backoff.
//!
//! While the service is healthy the poller waits `interval` between polls.
//! Each consecutive failure multiplies the wait, up to `max_delay`; the
//! first success drops back to `interval`.

use std::time::Duration;

/// Shortest delay the poller will ever wait between polls.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Tunable parameters for the poll schedule.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay between polls while healthy.
    pub interval: Duration,
    /// Upper bound on the delay after repeated failures.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`BackoffConfig::max_delay`].
pub fn next_delay(current: Duration, config: &BackoffConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Current position in the poll schedule.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    delay: Duration,
    failures: u32,
}

impl Backoff {
    /// Intervals below [`MIN_INTERVAL`] are raised to it, so failures always
    /// grow the delay.
    pub fn new(mut config: BackoffConfig) -> Self {
        config.interval = config.interval.max(MIN_INTERVAL);
        config.max_delay = config.max_delay.max(config.interval);
        let delay = config.interval;
        Self {
            config,
            delay,
            failures: 0,
        }
    }

    /// How long to wait before the next poll.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Consecutive failures since the last success.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
        self.delay = self.config.interval;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
        self.delay = next_delay(self.delay, &self.config);
    }
}
