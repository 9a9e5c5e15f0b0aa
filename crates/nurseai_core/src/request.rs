//! Requests to, and responses from, the external generative service.

use crate::{Content, TargetId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One unit of work destined for the external service.
///
/// # Examples
///
/// ```
/// use nurseai_core::{Content, OutboundRequestBuilder, Role, TargetId};
///
/// let request = OutboundRequestBuilder::default()
///     .target_id(TargetId::from("rec-1"))
///     .contents(vec![Content::text(Role::User, "Summarise this capture")])
///     .build()
///     .unwrap();
///
/// assert_eq!(request.target_id().as_str(), "rec-1");
/// assert!(request.requested_model().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct OutboundRequest {
    /// Record this request is about
    target_id: TargetId,
    /// Conversation turns, in order
    contents: Vec<Content>,
    /// Model to use instead of the resolved one
    #[builder(default)]
    requested_model: Option<String>,
}

impl OutboundRequest {
    /// Create a request against whichever model is currently resolved.
    pub fn new(target_id: TargetId, contents: Vec<Content>) -> Self {
        Self {
            target_id,
            contents,
            requested_model: None,
        }
    }

    /// Pin this request to a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.requested_model = Some(model.into());
        self
    }
}

/// Successful response from the external service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerateResponse {
    /// Generated text (all text parts of the first candidate, concatenated)
    text: String,
    /// Model that produced the text
    model: String,
}

impl GenerateResponse {
    /// Create a response.
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
        }
    }

    /// Consume the response, keeping only the text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Per-request context carried from the inbound API into the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerationContext {
    /// Patient identifier included in the prompt
    patient_id: Option<String>,
    /// Patient display name, stored with the capture only
    patient_name: Option<String>,
}

impl GenerationContext {
    /// Create a context.
    pub fn new(patient_id: Option<String>, patient_name: Option<String>) -> Self {
        Self {
            patient_id,
            patient_name,
        }
    }
}
