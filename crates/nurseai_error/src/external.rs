//! Failures of the external generative service and retry classification.

use std::time::Duration;

/// Which transient condition the external service reported.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TransientCategory {
    /// HTTP 429: the caller exceeded its quota
    RateLimited,
    /// HTTP 503: the service is overloaded
    Overloaded,
}

/// Ways an outbound call to the external service can fail.
///
/// `Transient`, `ModelUnavailable` and `Permanent` are produced by
/// interpreting a single response. `RateLimited` and `NoCompatibleModel` are
/// produced by the gateway after retries and model discovery have run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ExternalFailureKind {
    /// A failure expected to clear if retried later
    #[display("transient {} (retry hint: {:?})", category, retry_after)]
    Transient {
        /// What kind of transient condition
        category: TransientCategory,
        /// Wait requested by the server, if it sent one
        retry_after: Option<Duration>,
    },
    /// The requested model identifier is not recognised
    #[display("model not found: {}", _0)]
    ModelUnavailable(String),
    /// No listed model supports the required generation capability
    #[display("no compatible model supports {}", _0)]
    NoCompatibleModel(String),
    /// Transient retries were exhausted on a rate-limit condition
    #[display("rate limited, retry after {}s", retry_after.as_secs())]
    RateLimited {
        /// Best-known wait before the caller should try again
        retry_after: Duration,
    },
    /// A failure that retrying cannot fix
    #[display("{}", _0)]
    Permanent(String),
}

/// External service failure with source location tracking.
///
/// # Examples
///
/// ```
/// use nurseai_error::{ExternalFailure, ExternalFailureKind, RetryableError, TransientCategory};
///
/// let err = ExternalFailure::new(ExternalFailureKind::Transient {
///     category: TransientCategory::Overloaded,
///     retry_after: None,
/// });
/// assert!(err.is_retryable());
///
/// let err = ExternalFailure::permanent("API key not valid");
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("External Failure: {} at line {} in {}", kind, line, file)]
pub struct ExternalFailure {
    /// The kind of failure
    pub kind: ExternalFailureKind,
    /// Line number where the failure was created
    pub line: u32,
    /// File where the failure was created
    pub file: &'static str,
}

impl ExternalFailure {
    /// Create a new failure with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExternalFailureKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a [`ExternalFailureKind::Permanent`] failure.
    #[track_caller]
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::new(ExternalFailureKind::Permanent(message.into()))
    }

    /// Shorthand for a [`ExternalFailureKind::Transient`] failure.
    #[track_caller]
    pub fn transient(category: TransientCategory, retry_after: Option<Duration>) -> Self {
        Self::new(ExternalFailureKind::Transient {
            category,
            retry_after,
        })
    }

    /// The failure kind.
    pub fn kind(&self) -> &ExternalFailureKind {
        &self.kind
    }

    /// True when the failure is the surfaced rate-limit outcome.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ExternalFailureKind::RateLimited { .. })
    }
}

/// Result type for calls to the external service.
pub type ExternalResult<T> = std::result::Result<T, ExternalFailure>;

/// Trait for errors that support retry logic.
///
/// Transient errors (429, 503) return true. Permanent errors (401, 400,
/// unknown model after fallback) return false.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Wait the server asked for before the next attempt, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl RetryableError for ExternalFailure {
    fn is_retryable(&self) -> bool {
        matches!(self.kind, ExternalFailureKind::Transient { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        match self.kind {
            ExternalFailureKind::Transient { retry_after, .. } => retry_after,
            ExternalFailureKind::RateLimited { retry_after } => Some(retry_after),
            _ => None,
        }
    }
}
