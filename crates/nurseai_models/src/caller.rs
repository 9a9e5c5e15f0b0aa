//! Paced, retried and model-falling-back calls to the external service.

use crate::{GenerativeService, ModelResolver, normalize_model_name};
use nurseai_core::{GenerateResponse, OutboundRequest, RetryPolicyConfig};
use nurseai_error::{
    ExternalFailure, ExternalFailureKind, ExternalResult, RetryableError, TransientCategory,
};
use nurseai_rate_limit::{BackoffSchedule, RateGate};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Wraps outbound calls with pacing, transient retry and model fallback.
///
/// Every attempt passes through the shared [`RateGate`]. Transient failures
/// (429, 503) are retried up to `max_retries` times, waiting for the server's
/// hint when it sent one and `min(base * 2^attempt, max)` otherwise. Backoff
/// waits are plain sleeps; no lock or connection is held across them.
///
/// When retries run out on a transient failure the caller surfaces
/// [`ExternalFailureKind::RateLimited`] with the best-known wait (the last
/// hint, or the configured floor). A 503 only does so when
/// `overload_is_rate_limited` is set; otherwise it becomes permanent.
///
/// A "model not found" failure asks the [`ModelResolver`] for a fallback and
/// retries once with it. If that also fails the failure is permanent.
#[derive(Debug, Clone)]
pub struct ResilientCaller {
    service: Arc<dyn GenerativeService>,
    resolver: Arc<ModelResolver>,
    gate: RateGate,
    policy: RetryPolicyConfig,
}

impl ResilientCaller {
    /// Create a caller.
    pub fn new(
        service: Arc<dyn GenerativeService>,
        resolver: Arc<ModelResolver>,
        gate: RateGate,
        policy: RetryPolicyConfig,
    ) -> Self {
        Self {
            service,
            resolver,
            gate,
            policy,
        }
    }

    /// The resolver used for fallback.
    pub fn resolver(&self) -> &Arc<ModelResolver> {
        &self.resolver
    }

    /// The shared gate every attempt passes through.
    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// Perform one logical call.
    ///
    /// # Errors
    ///
    /// - [`ExternalFailureKind::RateLimited`] once transient retries are exhausted
    /// - [`ExternalFailureKind::NoCompatibleModel`] if no model can be resolved
    /// - [`ExternalFailureKind::Permanent`] for everything else
    #[instrument(skip(self, request), fields(target_id = %request.target_id()))]
    pub async fn call(&self, request: &OutboundRequest) -> ExternalResult<GenerateResponse> {
        let model = match request.requested_model() {
            Some(model) => normalize_model_name(model),
            None => self
                .resolver
                .resolve()
                .await
                .map_err(|failure| self.classify_exhausted(failure, 1))?,
        };

        match self.call_with_retry(&model, request).await {
            Err(failure) if matches!(failure.kind(), ExternalFailureKind::ModelUnavailable(_)) => {
                warn!(model = %model, "Model not found, resolving fallback");
                self.call_fallback(&model, request).await
            }
            result => result,
        }
    }

    async fn call_fallback(
        &self,
        failed_model: &str,
        request: &OutboundRequest,
    ) -> ExternalResult<GenerateResponse> {
        let fallback = self
            .resolver
            .fallback(failed_model)
            .await
            .map_err(|failure| self.classify_exhausted(failure, 1))?;
        if fallback == failed_model {
            return Err(ExternalFailure::permanent(format!(
                "Model {} is unavailable and no alternative is listed",
                failed_model
            )));
        }

        info!(from = %failed_model, to = %fallback, "Retrying with fallback model");
        match self.call_with_retry(&fallback, request).await {
            Err(failure) => match failure.kind() {
                ExternalFailureKind::ModelUnavailable(model) => {
                    Err(ExternalFailure::permanent(format!(
                        "Fallback model {} is also unavailable",
                        model
                    )))
                }
                _ => Err(failure),
            },
            ok => ok,
        }
    }

    /// Call `model`, retrying transient failures, and classify exhaustion.
    ///
    /// Each wait is the server's hint when the failure carried one, otherwise
    /// the next backoff delay. Retries stop when the schedule runs dry.
    async fn call_with_retry(
        &self,
        model: &str,
        request: &OutboundRequest,
    ) -> ExternalResult<GenerateResponse> {
        let mut schedule = BackoffSchedule::from_policy(&self.policy);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            self.gate.acquire().await;
            debug!(model, attempt, "Calling external service");

            let failure = match self.service.generate(model, request).await {
                Ok(response) => return Ok(response),
                Err(failure) => failure,
            };

            if !failure.is_retryable() {
                return Err(self.classify_exhausted(failure, attempt));
            }
            let Some(backoff) = schedule.next() else {
                return Err(self.classify_exhausted(failure, attempt));
            };

            let wait = failure.retry_after().unwrap_or(backoff);
            warn!(
                model,
                attempt,
                wait_ms = wait.as_millis() as u64,
                error = %failure,
                "Transient failure, will retry"
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Map a transient failure that outlived its retries onto the surfaced outcome.
    fn classify_exhausted(&self, failure: ExternalFailure, attempts: u32) -> ExternalFailure {
        let ExternalFailureKind::Transient {
            category,
            retry_after,
        } = failure.kind().clone()
        else {
            return failure;
        };

        let wait = retry_after.unwrap_or_else(|| self.policy.rate_limited_floor());
        match category {
            TransientCategory::Overloaded if !*self.policy.overload_is_rate_limited() => {
                warn!(attempts, "Service still overloaded after retries");
                ExternalFailure::permanent(format!(
                    "External service overloaded after {} attempts",
                    attempts
                ))
            }
            _ => {
                warn!(
                    attempts,
                    %category,
                    retry_after_secs = wait.as_secs(),
                    "Retries exhausted, reporting rate limited"
                );
                ExternalFailure::new(ExternalFailureKind::RateLimited { retry_after: wait })
            }
        }
    }
}
