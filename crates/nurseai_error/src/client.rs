//! Errors raised by the client-side retry workflow.

/// Retry ticket persistence and backend errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RetryTicketErrorKind {
    /// The persisted ticket could not be read
    #[display("Failed to load retry ticket: {}", _0)]
    Load(String),
    /// The ticket could not be written
    #[display("Failed to save retry ticket: {}", _0)]
    Save(String),
    /// The ticket could not be removed
    #[display("Failed to clear retry ticket: {}", _0)]
    Clear(String),
    /// The backend answered with something other than a generation outcome
    #[display("Unexpected backend response: {}", _0)]
    Backend(String),
}

/// Retry workflow error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Retry Ticket Error: {} at line {} in {}", kind, line, file)]
pub struct RetryTicketError {
    /// The kind of error that occurred
    pub kind: RetryTicketErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RetryTicketError {
    /// Create a new retry ticket error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RetryTicketErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
