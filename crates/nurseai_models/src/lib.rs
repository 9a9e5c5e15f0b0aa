//! External generative service integration for NurseAI.
//!
//! This crate owns everything between the gateway and the third-party
//! service:
//!
//! - [`GenerativeService`], the two calls the gateway needs (model listing and
//!   content generation), with failures already classified into
//!   [`ExternalFailure`](nurseai_error::ExternalFailure)
//! - [`GeminiRestClient`], the REST implementation
//! - [`ModelResolver`], which discovers and caches the model to use
//! - [`ResilientCaller`], which paces, retries and falls back
//!
//! # Example
//!
//! ```no_run
//! use nurseai_core::{Content, ModelsConfig, OutboundRequest, RetryPolicyConfig, Role, TargetId};
//! use nurseai_models::{GeminiRestClient, GenerativeService, ModelResolver, ResilientCaller};
//! use nurseai_rate_limit::RateGate;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let models = ModelsConfig::default();
//! let service: Arc<dyn GenerativeService> = Arc::new(GeminiRestClient::from_env(&models)?);
//! let resolver = Arc::new(ModelResolver::from_config(service.clone(), &models));
//! let caller = ResilientCaller::new(
//!     service,
//!     resolver,
//!     RateGate::new(Duration::from_secs(1)),
//!     RetryPolicyConfig::default(),
//! );
//!
//! let request = OutboundRequest::new(
//!     TargetId::from("rec-1"),
//!     vec![Content::text(Role::User, "Hello")],
//! );
//! let response = caller.call(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod caller;
mod gemini;
mod resolver;
mod service;

pub use caller::ResilientCaller;
pub use gemini::GeminiRestClient;
pub use resolver::{ModelResolver, normalize_model_name, select_model};
pub use service::GenerativeService;
