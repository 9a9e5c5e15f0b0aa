//! The generation façade the backend calls.

use crate::{CaptureMedia, PromptTemplate};
use nurseai_core::{
    GenerateResponse, GenerationContext, GenerationOutcome, OutboundRequest, SuggestionRecord,
    TargetId, whole_seconds,
};
use nurseai_error::{ExternalFailureKind, ExternalResult};
use nurseai_models::ResilientCaller;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Generates clinical suggestions through the resilient caller.
///
/// Every call funnels through the caller's shared rate gate, so one
/// `GatewayService` (or clones of it) should be built per process.
#[derive(Debug, Clone)]
pub struct GatewayService {
    caller: Arc<ResilientCaller>,
    prompt: PromptTemplate,
}

impl GatewayService {
    /// Create a service using the bundled clinical prompt.
    pub fn new(caller: Arc<ResilientCaller>) -> Self {
        Self {
            caller,
            prompt: PromptTemplate::bundled(),
        }
    }

    /// Replace the instruction prompt.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// The underlying caller.
    pub fn caller(&self) -> &Arc<ResilientCaller> {
        &self.caller
    }

    /// The instruction prompt in use.
    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    /// Generate the first suggestion for a capture.
    ///
    /// The returned record is new and has not been persisted.
    #[instrument(skip(self, media, context), fields(target_id = %target_id))]
    pub async fn generate_initial(
        &self,
        target_id: &TargetId,
        media: &CaptureMedia,
        context: &GenerationContext,
    ) -> GenerationOutcome<SuggestionRecord> {
        let request = OutboundRequest::new(
            target_id.clone(),
            self.prompt.initial_contents(media, context),
        );

        outcome_from(self.caller.call(&request).await).map(|response| {
            info!(model = %response.model(), "Generated suggestion");
            SuggestionRecord::new(target_id.clone(), response.into_text())
        })
    }

    /// Ask the service to revise `prior_content` given a new message.
    ///
    /// Returns the revised text; the caller decides where to store it.
    #[instrument(skip(self, prior_content, message, context), fields(target_id = %target_id))]
    pub async fn generate_followup(
        &self,
        target_id: &TargetId,
        prior_content: &str,
        message: &str,
        context: &GenerationContext,
    ) -> GenerationOutcome<String> {
        let request = OutboundRequest::new(
            target_id.clone(),
            self.prompt.followup_contents(prior_content, message, context),
        );

        outcome_from(self.caller.call(&request).await).map(|response| {
            info!(model = %response.model(), "Revised suggestion");
            response.into_text()
        })
    }
}

/// Fold a call result into the three-way outcome.
pub fn outcome_from(result: ExternalResult<GenerateResponse>) -> GenerationOutcome<GenerateResponse> {
    match result {
        Ok(response) if response.text().trim().is_empty() => {
            warn!(model = %response.model(), "Service returned no text");
            GenerationOutcome::permanent("The service returned an empty suggestion")
        }
        Ok(response) => GenerationOutcome::success(response),
        Err(failure) => match failure.kind() {
            ExternalFailureKind::RateLimited { retry_after } => GenerationOutcome::RateLimited {
                retry_after_seconds: whole_seconds(*retry_after),
            },
            kind => {
                warn!(error = %kind, "Generation failed");
                GenerationOutcome::permanent(kind.to_string())
            }
        },
    }
}
