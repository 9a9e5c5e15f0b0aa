//! What the user is told after each step of the retry workflow.

use nurseai_core::SuggestionRecord;
use nurseai_extraction::MissingFieldSet;

/// Shown when the retry budget is spent.
pub const LIMIT_REACHED_MESSAGE: &str = "Retry limit reached. Please try again later.";

/// Result of a retry workflow step, with the guidance to show for it.
#[derive(Debug, Clone, PartialEq, Eq, strum::EnumIs)]
pub enum RetryNotice {
    /// The backend is busy; a ticket is armed
    RateLimited {
        /// Seconds until the next retry is allowed
        seconds: u64,
        /// Rate-limited retries so far
        attempts: u32,
    },
    /// A retry was requested before the ticket became eligible
    PleaseWait {
        /// Seconds until the retry is allowed
        seconds: u64,
    },
    /// The ticket ran out of attempts and was discarded
    LimitReached,
    /// The retry produced a suggestion
    Completed {
        /// The generated suggestion
        suggestion: SuggestionRecord,
        /// Fields the clinician still has to supply
        missing: MissingFieldSet,
    },
    /// The retry failed for a reason retrying cannot fix
    Failed {
        /// Reason reported by the backend
        message: String,
    },
    /// Another retry is already running
    InFlight,
    /// There is no ticket to retry
    NoPendingRetry,
    /// The ticket outlived its window and was discarded
    Expired,
}

impl RetryNotice {
    /// User-facing guidance.
    ///
    /// ```
    /// use nurseai_client::RetryNotice;
    ///
    /// assert_eq!(
    ///     RetryNotice::PleaseWait { seconds: 42 }.message(),
    ///     "Try again in 42 seconds."
    /// );
    /// ```
    pub fn message(&self) -> String {
        match self {
            Self::RateLimited { seconds, .. } => format!(
                "Your recording could not be sent due to too many concurrent users. \
                 Please try again in {} seconds.",
                seconds
            ),
            Self::PleaseWait { seconds } => format!("Try again in {} seconds.", seconds),
            Self::LimitReached => LIMIT_REACHED_MESSAGE.to_string(),
            Self::Completed { missing, .. } if missing.is_empty() => {
                "Suggestion ready.".to_string()
            }
            Self::Completed { missing, .. } => {
                let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
                format!("Suggestion ready. Missing data: {}.", labels.join(", "))
            }
            Self::Failed { message } => format!("Suggestion failed: {}", message),
            Self::InFlight => "A retry is already in progress.".to_string(),
            Self::NoPendingRetry => "No retry is pending.".to_string(),
            Self::Expired => "The pending retry expired. Please record again.".to_string(),
        }
    }

    /// True when the workflow has nothing further to do for this ticket.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            Self::RateLimited { .. } | Self::PleaseWait { .. } | Self::InFlight
        )
    }
}
