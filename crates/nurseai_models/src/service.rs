//! The external service boundary.

use async_trait::async_trait;
use nurseai_core::{GenerateResponse, ModelInfo, OutboundRequest};
use nurseai_error::ExternalResult;

/// The two calls the gateway makes to the external generative service.
///
/// Implementations classify every failure into an
/// [`ExternalFailure`](nurseai_error::ExternalFailure): transient conditions
/// (429, 503) with the server's wait hint, an unknown model (404), or a
/// permanent failure. Implementations do not retry or pace; that is the
/// caller's job.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// List the models the service currently offers.
    async fn list_models(&self) -> ExternalResult<Vec<ModelInfo>>;

    /// Generate content for `request` with the given model.
    ///
    /// `model` takes precedence over `request.requested_model()`.
    async fn generate(
        &self,
        model: &str,
        request: &OutboundRequest,
    ) -> ExternalResult<GenerateResponse>;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;
}

impl std::fmt::Debug for dyn GenerativeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GenerativeService({})", self.provider_name())
    }
}
