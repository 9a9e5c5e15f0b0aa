//! Bounded exponential backoff.

use nurseai_core::RetryPolicyConfig;
use std::time::Duration;

/// Delay sequence `min(base * 2^attempt, max)` for `attempt` in `0..max_retries`.
///
/// The iterator ends once the retry budget is spent. With jitter enabled each
/// delay is randomised downwards and never exceeds its unjittered value.
///
/// # Examples
///
/// ```
/// use nurseai_rate_limit::BackoffSchedule;
/// use std::time::Duration;
///
/// let delays: Vec<_> = BackoffSchedule::new(Duration::from_secs(1), Duration::from_secs(5), 4).collect();
/// assert_eq!(
///     delays,
///     vec![
///         Duration::from_secs(1),
///         Duration::from_secs(2),
///         Duration::from_secs(4),
///         Duration::from_secs(5),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    base: Duration,
    max: Duration,
    max_retries: u32,
    attempt: u32,
    jitter: bool,
}

impl BackoffSchedule {
    /// Create a schedule without jitter.
    pub fn new(base: Duration, max: Duration, max_retries: u32) -> Self {
        Self {
            base,
            max,
            max_retries,
            attempt: 0,
            jitter: false,
        }
    }

    /// Create a schedule from the `[gateway.retry]` section.
    pub fn from_policy(policy: &RetryPolicyConfig) -> Self {
        Self::new(
            policy.base_backoff(),
            policy.max_backoff(),
            *policy.max_retries(),
        )
        .with_jitter(*policy.jitter())
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry number `attempt` (zero-based), ignoring jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base
            .checked_mul(factor)
            .unwrap_or(self.max)
            .min(self.max)
    }
}

impl Iterator for BackoffSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_retries {
            return None;
        }
        let delay = self.delay_for(self.attempt);
        self.attempt += 1;
        if self.jitter {
            Some(tokio_retry2::strategy::jitter(delay).min(delay))
        } else {
            Some(delay)
        }
    }
}
