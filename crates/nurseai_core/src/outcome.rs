//! The three-way result of a generation attempt.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of asking the external service for a suggestion.
///
/// A rate-limited outcome is not an error: it tells the caller when the
/// service is expected to accept work again. Serialised with a `status` tag
/// so the inbound API and the client retry workflow agree on the shape.
///
/// # Examples
///
/// ```
/// use nurseai_core::GenerationOutcome;
///
/// let outcome: GenerationOutcome<String> = GenerationOutcome::RateLimited {
///     retry_after_seconds: 60,
/// };
/// let json = serde_json::to_value(&outcome).unwrap();
/// assert_eq!(json["status"], "rate_limited");
/// assert_eq!(json["retry_after_seconds"], 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome<T> {
    /// The service produced a result
    Success {
        /// The produced value
        #[serde(flatten)]
        value: T,
    },
    /// The service is overloaded; try again after the given wait
    RateLimited {
        /// Seconds to wait before the next attempt
        retry_after_seconds: u64,
    },
    /// The request will not succeed if retried
    PermanentError {
        /// Human-readable reason
        message: String,
    },
}

impl<T> GenerationOutcome<T> {
    /// Wrap a successful value.
    pub fn success(value: T) -> Self {
        Self::Success { value }
    }

    /// Build a permanent error outcome.
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::PermanentError {
            message: message.into(),
        }
    }

    /// True for [`GenerationOutcome::RateLimited`].
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Transform the success value, leaving the other variants untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GenerationOutcome<U> {
        match self {
            Self::Success { value } => GenerationOutcome::Success { value: f(value) },
            Self::RateLimited {
                retry_after_seconds,
            } => GenerationOutcome::RateLimited {
                retry_after_seconds,
            },
            Self::PermanentError { message } => GenerationOutcome::PermanentError { message },
        }
    }

    /// The success value, if any.
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success { value } => Some(value),
            _ => None,
        }
    }
}

/// Whole seconds to report for a wait, rounded up.
///
/// A sub-second remainder never collapses to "retry now".
pub fn whole_seconds(wait: Duration) -> u64 {
    let secs = wait.as_secs();
    if wait.subsec_nanos() > 0 { secs + 1 } else { secs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SuggestionRecord, TargetId};

    #[test]
    fn success_flattens_the_record() {
        let record = SuggestionRecord::new(TargetId::from("rec-7"), "1. Summary");
        let outcome = GenerationOutcome::success(record.clone());

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["target_id"], "rec-7");
        assert_eq!(json["content"], "1. Summary");

        let back: GenerationOutcome<SuggestionRecord> = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn permanent_error_carries_message() {
        let json = serde_json::json!({"status": "permanent_error", "message": "bad key"});
        let outcome: GenerationOutcome<SuggestionRecord> = serde_json::from_value(json).unwrap();
        assert_eq!(outcome, GenerationOutcome::permanent("bad key"));
    }

    #[test]
    fn partial_seconds_round_up() {
        assert_eq!(whole_seconds(Duration::from_millis(61_200)), 62);
        assert_eq!(whole_seconds(Duration::from_secs(60)), 60);
        assert_eq!(whole_seconds(Duration::from_millis(1)), 1);
        assert_eq!(whole_seconds(Duration::ZERO), 0);
    }

    #[test]
    fn map_preserves_non_success() {
        let limited: GenerationOutcome<u32> = GenerationOutcome::RateLimited {
            retry_after_seconds: 12,
        };
        assert_eq!(
            limited.map(|n| n + 1),
            GenerationOutcome::RateLimited {
                retry_after_seconds: 12
            }
        );
    }
}
