//! Process-wide spacing of outbound calls.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use nurseai_core::GateConfig;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, trace};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Throttle guaranteeing a minimum spacing between dispatches.
///
/// Each `acquire` reserves the next free dispatch slot under a fair
/// (FIFO) mutex, releases the mutex, and then sleeps until its slot. Slots
/// are handed out `min_interval` apart, so no two callers are ever released
/// closer together than that, however many are queued. The reservation is
/// the only read-modify-write of shared state; nobody holds the lock while
/// sleeping.
///
/// A caller that is cancelled after reserving still consumes its slot.
///
/// An optional requests-per-minute cap (GCRA, via `governor`) can be layered
/// on top for quotas expressed per minute rather than as a spacing.
///
/// # Example
///
/// ```rust,no_run
/// use nurseai_rate_limit::RateGate;
/// use std::time::Duration;
///
/// # async fn example() {
/// let gate = RateGate::new(Duration::from_secs(1));
/// gate.acquire().await;
/// // ... issue the outbound call ...
/// # }
/// ```
#[derive(Clone)]
pub struct RateGate {
    min_interval: Duration,
    // Earliest instant the next caller may be released
    next_slot: Arc<Mutex<Option<Instant>>>,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
}

impl std::fmt::Debug for RateGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGate")
            .field("min_interval", &self.min_interval)
            .field("rpm_capped", &self.rpm_limiter.is_some())
            .finish_non_exhaustive()
    }
}

impl RateGate {
    /// Create a gate enforcing `min_interval` between dispatches.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Arc::new(Mutex::new(None)),
            rpm_limiter: None,
        }
    }

    /// Create a gate from the `[gateway]` configuration section.
    #[instrument(skip(config), fields(min_interval_ms = *config.min_interval_ms()))]
    pub fn from_config(config: &GateConfig) -> Self {
        let gate = Self::new(config.min_interval());
        match config.requests_per_minute() {
            Some(rpm) => gate.with_requests_per_minute(*rpm),
            None => gate,
        }
    }

    /// Additionally cap dispatches per minute. Zero disables the cap.
    pub fn with_requests_per_minute(mut self, rpm: u32) -> Self {
        self.rpm_limiter = NonZeroU32::new(rpm).map(|n| {
            debug!(rpm, "Enabling per-minute cap");
            Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n)))
        });
        self
    }

    /// Configured minimum spacing.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for this caller's turn.
    ///
    /// Callers are served in arrival order. This cannot fail, only delay.
    pub async fn acquire(&self) {
        let slot = {
            let mut next_slot = self.next_slot.lock().await;

            // Per-minute quota is checked in queue order so it cannot reorder callers
            if let Some(limiter) = &self.rpm_limiter {
                limiter.until_ready().await;
            }

            let now = Instant::now();
            let slot = match *next_slot {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next_slot = Some(slot + self.min_interval);
            slot
        };

        let wait = slot.saturating_duration_since(Instant::now());
        trace!(wait_ms = wait.as_millis() as u64, "Rate gate slot reserved");
        tokio::time::sleep_until(slot).await;
    }
}

impl From<&GateConfig> for RateGate {
    fn from(config: &GateConfig) -> Self {
        Self::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_caller_is_not_delayed() {
        let gate = RateGate::new(Duration::from_secs(5));
        let start = Instant::now();
        gate.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_gate_does_not_delay_after_interval() {
        let gate = RateGate::new(Duration::from_secs(1));
        gate.acquire().await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        let start = Instant::now();
        gate.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn back_to_back_callers_are_spaced() {
        let gate = RateGate::new(Duration::from_millis(500));
        let start = Instant::now();
        gate.acquire().await;
        gate.acquire().await;
        gate.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
