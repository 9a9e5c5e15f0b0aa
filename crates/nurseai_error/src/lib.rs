//! Error types for the NurseAI gateway.
//!
//! This crate provides the error types shared by every NurseAI crate.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with the source location that raised it
//! - Constructors use `#[track_caller]` so the location is captured automatically
//!
//! [`ExternalFailure`] is the one error type with behavior attached: it models
//! how the external generative service failed and whether the failure may be
//! retried (see [`RetryableError`]).
//!
//! # Examples
//!
//! ```
//! use nurseai_error::{ConfigError, NurseAiResult};
//!
//! fn load() -> NurseAiResult<String> {
//!     Err(ConfigError::new("missing [gateway] section"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod external;
mod http;
mod json;
mod storage;
mod validation;

pub use client::{RetryTicketError, RetryTicketErrorKind};
pub use config::ConfigError;
pub use error::{NurseAiError, NurseAiErrorKind, NurseAiResult};
pub use external::{
    ExternalFailure, ExternalFailureKind, ExternalResult, RetryableError, TransientCategory,
};
pub use http::HttpError;
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
pub use validation::ValidationError;
