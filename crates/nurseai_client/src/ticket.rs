//! The persisted retry ticket and the coordinator's state.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use nurseai_core::TargetId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A pending retry for one capture, persisted across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct RetryTicket {
    /// Capture whose suggestion is pending
    target_id: TargetId,
    /// Rate-limited retries so far
    attempts: u32,
    /// Earliest time a retry may be sent
    next_eligible_at: DateTime<Utc>,
    /// After this the ticket is treated as absent
    expires_at: DateTime<Utc>,
}

impl RetryTicket {
    /// Create a ticket from its parts.
    pub fn new(
        target_id: TargetId,
        attempts: u32,
        next_eligible_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target_id,
            attempts,
            next_eligible_at,
            expires_at,
        }
    }

    /// True once `now` is past `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Wait until a retry may be sent, zero once eligible.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.next_eligible_at - now).to_std().unwrap_or_default()
    }

    /// Record another rate-limited attempt, keeping the expiry.
    pub(crate) fn rearm(&mut self, next_eligible_at: DateTime<Utc>) {
        self.attempts = self.attempts.saturating_add(1);
        self.next_eligible_at = next_eligible_at;
    }
}

/// Whether a rate-limited generation is waiting to be retried.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, strum::EnumIs)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RetryState {
    /// Nothing pending
    #[default]
    Idle,
    /// A retry is pending
    RateLimited(RetryTicket),
}

impl RetryState {
    /// The pending ticket, if any.
    pub fn ticket(&self) -> Option<&RetryTicket> {
        match self {
            Self::Idle => None,
            Self::RateLimited(ticket) => Some(ticket),
        }
    }
}
