//! Suggestion generation for the NurseAI backend.
//!
//! [`GatewayService`] is the only way the backend talks to the external
//! generative service. It exposes two operations:
//!
//! - [`GatewayService::generate_initial`] turns a capture's recording (and
//!   optional photo) into a new [`SuggestionRecord`](nurseai_core::SuggestionRecord)
//! - [`GatewayService::generate_followup`] revises an existing suggestion,
//!   replaying it as conversational context so the service edits rather
//!   than restarts its structured output
//!
//! Both return a [`GenerationOutcome`](nurseai_core::GenerationOutcome):
//! success, rate-limited with a wait, or a permanent error.
//!
//! The [`api`] module serves these operations over HTTP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
mod prompt;
mod service;

pub use api::{ApiState, CaptureResponse, FollowupRequest, SuggestionView, create_router, serve};
pub use prompt::{CaptureMedia, MediaAttachment, PromptTemplate};
pub use service::{GatewayService, outcome_from};
