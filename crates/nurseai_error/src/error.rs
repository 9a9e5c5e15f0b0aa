//! Top-level error wrapper types.

use crate::{
    ConfigError, ExternalFailure, HttpError, JsonError, RetryTicketError, StorageError,
    ValidationError,
};

/// Every error condition a NurseAI crate can raise.
///
/// # Examples
///
/// ```
/// use nurseai_error::{NurseAiError, HttpError};
///
/// let err: NurseAiError = HttpError::new("Connection failed").into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum NurseAiErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// External generative service failure
    #[from(ExternalFailure)]
    External(ExternalFailure),
    /// Client retry workflow error
    #[from(RetryTicketError)]
    RetryTicket(RetryTicketError),
    /// Invalid caller input
    #[from(ValidationError)]
    Validation(ValidationError),
}

/// NurseAI error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("NurseAI Error: {}", _0)]
pub struct NurseAiError(Box<NurseAiErrorKind>);

impl NurseAiError {
    /// Create a new error from a kind.
    pub fn new(kind: NurseAiErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &NurseAiErrorKind {
        &self.0
    }

    /// The external service failure this error wraps, if any.
    pub fn as_external(&self) -> Option<&ExternalFailure> {
        match self.kind() {
            NurseAiErrorKind::External(failure) => Some(failure),
            _ => None,
        }
    }
}

impl<T> From<T> for NurseAiError
where
    T: Into<NurseAiErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for NurseAI operations.
pub type NurseAiResult<T> = std::result::Result<T, NurseAiError>;
