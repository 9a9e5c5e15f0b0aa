//! Pacing and retry timing for calls to the external generative service.
//!
//! This crate provides:
//! - [`RateGate`], the single process-wide throttle every outbound call
//!   passes through
//! - [`BackoffSchedule`], the bounded exponential delay sequence used between
//!   transient failures
//! - [`retry_after`] helpers that read the service's wait hint from response
//!   headers or the error body
//! - [`NurseAiConfig`], the layered configuration loader

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backoff;
mod config;
mod gate;
pub mod retry_after;

pub use backoff::BackoffSchedule;
pub use config::NurseAiConfig;
pub use gate::RateGate;
