//! Core data types for the NurseAI suggestion gateway.
//!
//! This crate provides the data model shared by the backend gateway and the
//! client retry workflow: outbound requests to the external generative
//! service, the persisted suggestion record, and the three-way generation
//! outcome that crosses every boundary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod content;
mod model;
mod outcome;
mod record;
mod request;
mod role;
mod target;

pub use config::{
    ClientRetryConfig, ClientRetryConfigBuilder, GateConfig, GateConfigBuilder, ModelsConfig,
    ModelsConfigBuilder, RetryPolicyConfig, RetryPolicyConfigBuilder, ServerConfig,
    ServerConfigBuilder,
};
pub use content::{Content, Part};
pub use model::ModelInfo;
pub use outcome::{GenerationOutcome, whole_seconds};
pub use record::{CaptureRecord, SuggestionRecord};
pub use request::{
    GenerateResponse, GenerationContext, OutboundRequest, OutboundRequestBuilder,
    OutboundRequestBuilderError,
};
pub use role::Role;
pub use target::TargetId;
