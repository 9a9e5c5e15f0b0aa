//! The backend operation a retry re-invokes.

use nurseai_core::{GenerationOutcome, SuggestionRecord, TargetId};
use nurseai_error::{HttpError, NurseAiResult, RetryTicketError, RetryTicketErrorKind};
use std::time::Duration;
use tracing::{debug, instrument};

/// Re-runs suggestion generation for a stored capture.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync + std::fmt::Debug {
    /// Ask the backend to generate the suggestion for `target_id` again.
    ///
    /// # Errors
    ///
    /// Only when no outcome could be obtained (the backend was unreachable
    /// or answered with something that is not an outcome).
    async fn generate(&self, target_id: &TargetId)
    -> NurseAiResult<GenerationOutcome<SuggestionRecord>>;
}

/// [`GenerationBackend`] over the gateway's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGenerationBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGenerationBackend {
    /// Talk to the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> NurseAiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use an existing client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl GenerationBackend for HttpGenerationBackend {
    #[instrument(skip(self), fields(target_id = %target_id))]
    async fn generate(
        &self,
        target_id: &TargetId,
    ) -> NurseAiResult<GenerationOutcome<SuggestionRecord>> {
        let url = format!("{}/api/records/{}/suggestion", self.base_url, target_id);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("POST {}: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::new(format!("Reading response from {}: {}", url, e)))?;
        debug!(%status, "Backend answered");

        // Every status carries an outcome body; anything else is a broken backend.
        serde_json::from_str(&body).map_err(|e| {
            RetryTicketError::new(RetryTicketErrorKind::Backend(format!(
                "{} from {}: {} ({})",
                status, url, body, e
            )))
            .into()
        })
    }
}
