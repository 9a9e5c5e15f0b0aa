//! NurseAI - clinical suggestion gateway.
//!
//! Serialises calls to a rate-limited generative service, retries transient
//! failures with backoff, falls back across models and reports a definitive
//! rate limit as a structured outcome. The client side turns that outcome
//! into a persisted retry ticket that survives restarts.
//!
//! # Architecture
//!
//! - `nurseai_error` - Error types
//! - `nurseai_core` - Shared data model and configuration sections
//! - `nurseai_rate_limit` - RateGate, backoff schedule, layered configuration
//! - `nurseai_models` - Gemini REST client, model resolution, resilient calls
//! - `nurseai_extraction` - Missing-data detection and the follow-up form
//! - `nurseai_storage` - Media store and record repositories
//! - `nurseai_gateway` - GatewayService and the backend HTTP API
//! - `nurseai_client` - RetryCoordinator and its ticket store
//!
//! This crate re-exports everything for convenience and ships the `nurseai`
//! binary.
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry stdout span exporter bridged into `tracing`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observability;

pub use observability::{ObservabilityConfig, init_observability, shutdown_observability};

pub use nurseai_core::*;
pub use nurseai_error::*;

pub use nurseai_client::{
    Clock, FileTicketStore, GenerationBackend, HttpGenerationBackend, LIMIT_REACHED_MESSAGE,
    ManualClock, MemoryTicketStore, RetryCoordinator, RetryNotice, RetryState, RetryTicket,
    SystemClock, TICKET_FILE_NAME, TicketStore,
};
pub use nurseai_extraction::{
    FieldKeywords, KeywordTable, MissingDataForm, MissingField, MissingFieldSet, SectionMarkers,
    SuggestionExtractor,
};
pub use nurseai_gateway::{
    ApiState, CaptureMedia, CaptureResponse, FollowupRequest, GatewayService, MediaAttachment,
    PromptTemplate, SuggestionView, create_router, outcome_from, serve,
};
pub use nurseai_models::{
    GeminiRestClient, GenerativeService, ModelResolver, ResilientCaller, normalize_model_name,
    select_model,
};
pub use nurseai_rate_limit::{BackoffSchedule, NurseAiConfig, RateGate, retry_after};
pub use nurseai_storage::{
    CaptureRepository, FileSystemMediaStore, MediaHandle, MediaKind, MediaStore,
    MemoryCaptureRepository, MemorySuggestionRepository, SuggestionRepository,
};
