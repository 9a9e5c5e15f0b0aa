//! The client-side rate-limit retry workflow.

use crate::{
    Clock, FileTicketStore, GenerationBackend, HttpGenerationBackend, RetryNotice, RetryState,
    RetryTicket, SystemClock, TicketStore,
};
use chrono::{DateTime, Utc};
use nurseai_core::{
    ClientRetryConfig, GenerationOutcome, SuggestionRecord, TargetId, whole_seconds,
};
use nurseai_error::NurseAiResult;
use nurseai_extraction::SuggestionExtractor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Drives a rate-limited generation to completion across app restarts.
///
/// The workflow is a two-state machine:
///
/// ```text
/// Idle --rate limited--> RateLimited(ticket) --success / failure--> Idle
///                               |
///                               +--expired / attempts spent--> Idle (discarded)
/// ```
///
/// Exactly one ticket exists at a time. It is written to the
/// [`TicketStore`] on every change so [`resume`](Self::resume) can pick it
/// up after a restart. While one [`retry_now`](Self::retry_now) is running,
/// further calls return [`RetryNotice::InFlight`] without touching the
/// ticket.
#[derive(Debug)]
pub struct RetryCoordinator {
    backend: Arc<dyn GenerationBackend>,
    store: Arc<dyn TicketStore>,
    clock: Arc<dyn Clock>,
    extractor: Arc<SuggestionExtractor>,
    config: ClientRetryConfig,
    state: Mutex<RetryState>,
    in_flight: AtomicBool,
}

impl RetryCoordinator {
    /// Create a coordinator in the idle state. Call
    /// [`resume`](Self::resume) to pick up a persisted ticket.
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        store: Arc<dyn TicketStore>,
        clock: Arc<dyn Clock>,
        extractor: Arc<SuggestionExtractor>,
        config: ClientRetryConfig,
    ) -> Self {
        Self {
            backend,
            store,
            clock,
            extractor,
            config,
            state: Mutex::new(RetryState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    /// HTTP backend, on-disk ticket and the system clock, per `[client]`.
    pub fn from_config(
        config: ClientRetryConfig,
        extractor: Arc<SuggestionExtractor>,
    ) -> NurseAiResult<Self> {
        let backend = HttpGenerationBackend::new(config.backend_url().clone())?;
        let store = FileTicketStore::at_or_default(config.ticket_path().as_deref());
        Ok(Self::new(
            Arc::new(backend),
            Arc::new(store),
            Arc::new(SystemClock),
            extractor,
            config,
        ))
    }

    /// Current state.
    pub fn state(&self) -> RetryState {
        self.lock_state().clone()
    }

    /// Time until the pending retry may be sent; zero when idle or eligible.
    pub fn time_remaining(&self) -> Duration {
        self.lock_state()
            .ticket()
            .map(|ticket| ticket.time_remaining(self.clock.now()))
            .unwrap_or_default()
    }

    /// Load the persisted ticket, silently discarding it if it has expired
    /// or cannot be read.
    #[instrument(skip(self))]
    pub async fn resume(&self) -> NurseAiResult<RetryState> {
        let loaded = match self.store.load().await {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable retry ticket");
                self.store.clear().await?;
                None
            }
        };

        let state = match loaded {
            Some(ticket) if ticket.is_expired(self.clock.now()) => {
                debug!(target_id = %ticket.target_id(), "Discarding expired retry ticket");
                self.store.clear().await?;
                RetryState::Idle
            }
            Some(ticket) => RetryState::RateLimited(ticket),
            None => RetryState::Idle,
        };

        self.set_state(state.clone());
        Ok(state)
    }

    /// Arm (or re-arm) the ticket after the backend reported a rate limit.
    ///
    /// A fresh ticket starts at zero attempts with a full window. If a live
    /// ticket for the same target exists its attempts are incremented and
    /// its expiry kept. A zero wait falls back to the configured default.
    #[instrument(skip(self), fields(target_id = %target_id))]
    pub async fn on_rate_limited(
        &self,
        target_id: TargetId,
        retry_after_seconds: u64,
    ) -> NurseAiResult<RetryNotice> {
        let now = self.clock.now();
        let wait = self.wait_for(retry_after_seconds);

        let ticket = match self.lock_state().ticket() {
            Some(existing) if existing.target_id() == &target_id && !existing.is_expired(now) => {
                let mut ticket = existing.clone();
                ticket.rearm(after(now, wait));
                ticket
            }
            _ => RetryTicket::new(target_id, 0, after(now, wait), after(now, self.config.window())),
        };

        self.arm(ticket, wait).await
    }

    /// Route the outcome of an initial upload into the workflow.
    pub async fn handle_outcome(
        &self,
        target_id: TargetId,
        outcome: GenerationOutcome<SuggestionRecord>,
    ) -> NurseAiResult<RetryNotice> {
        match outcome {
            GenerationOutcome::RateLimited {
                retry_after_seconds,
            } => self.on_rate_limited(target_id, retry_after_seconds).await,
            GenerationOutcome::Success { value } => {
                self.discard_if_for(&target_id).await?;
                Ok(self.completed(value))
            }
            GenerationOutcome::PermanentError { message } => {
                self.discard_if_for(&target_id).await?;
                Ok(RetryNotice::Failed { message })
            }
        }
    }

    /// Retry the pending generation if it is allowed now.
    ///
    /// # Errors
    ///
    /// Only when the backend could not be reached or the ticket could not be
    /// persisted. The ticket is kept in that case so the user can try again.
    #[instrument(skip(self))]
    pub async fn retry_now(&self) -> NurseAiResult<RetryNotice> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Retry already in flight");
            return Ok(RetryNotice::InFlight);
        };

        let Some(ticket) = self.lock_state().ticket().cloned() else {
            return Ok(RetryNotice::NoPendingRetry);
        };

        let now = self.clock.now();
        if ticket.is_expired(now) {
            self.discard().await?;
            return Ok(RetryNotice::Expired);
        }
        if *ticket.attempts() >= *self.config.max_attempts() {
            info!(target_id = %ticket.target_id(), "Retry limit reached");
            self.discard().await?;
            return Ok(RetryNotice::LimitReached);
        }
        let remaining = ticket.time_remaining(now);
        if !remaining.is_zero() {
            return Ok(RetryNotice::PleaseWait {
                seconds: whole_seconds(remaining),
            });
        }

        info!(
            target_id = %ticket.target_id(),
            attempts = ticket.attempts(),
            "Retrying generation"
        );
        match self.backend.generate(ticket.target_id()).await? {
            GenerationOutcome::Success { value } => {
                self.discard().await?;
                Ok(self.completed(value))
            }
            GenerationOutcome::RateLimited {
                retry_after_seconds,
            } => {
                if ticket.attempts() + 1 >= *self.config.max_attempts() {
                    info!(target_id = %ticket.target_id(), "Retry limit reached");
                    self.discard().await?;
                    return Ok(RetryNotice::LimitReached);
                }
                let wait = self.wait_for(retry_after_seconds);
                let mut ticket = ticket;
                ticket.rearm(after(self.clock.now(), wait));
                self.arm(ticket, wait).await
            }
            GenerationOutcome::PermanentError { message } => {
                warn!(%message, "Retry failed permanently");
                self.discard().await?;
                Ok(RetryNotice::Failed { message })
            }
        }
    }

    /// Drop the pending ticket, if any.
    pub async fn clear(&self) -> NurseAiResult<()> {
        self.discard().await
    }

    async fn arm(&self, ticket: RetryTicket, wait: Duration) -> NurseAiResult<RetryNotice> {
        self.store.save(&ticket).await?;
        let notice = RetryNotice::RateLimited {
            seconds: whole_seconds(wait),
            attempts: *ticket.attempts(),
        };
        info!(
            target_id = %ticket.target_id(),
            attempts = ticket.attempts(),
            wait_secs = wait.as_secs(),
            "Retry ticket armed"
        );
        self.set_state(RetryState::RateLimited(ticket));
        Ok(notice)
    }

    async fn discard(&self) -> NurseAiResult<()> {
        self.store.clear().await?;
        self.set_state(RetryState::Idle);
        Ok(())
    }

    async fn discard_if_for(&self, target_id: &TargetId) -> NurseAiResult<()> {
        let pending = self
            .lock_state()
            .ticket()
            .is_some_and(|ticket| ticket.target_id() == target_id);
        if pending {
            self.discard().await?;
        }
        Ok(())
    }

    fn completed(&self, suggestion: SuggestionRecord) -> RetryNotice {
        let missing = self.extractor.extract_missing(suggestion.content());
        RetryNotice::Completed {
            suggestion,
            missing,
        }
    }

    fn wait_for(&self, retry_after_seconds: u64) -> Duration {
        match retry_after_seconds {
            0 => self.config.default_retry_after(),
            secs => Duration::from_secs(secs),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RetryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: RetryState) {
        *self.lock_state() = state;
    }
}

/// Clears the in-flight flag when the retry finishes, however it finishes.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn after(now: DateTime<Utc>, wait: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(wait)
        .ok()
        .and_then(|wait| now.checked_add_signed(wait))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
