//! Gemini REST client.

use super::dto::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, ListModelsResponse};
use crate::GenerativeService;
use crate::resolver::normalize_model_name;
use async_trait::async_trait;
use chrono::Utc;
use nurseai_core::{GenerateResponse, ModelInfo, ModelsConfig, OutboundRequest};
use nurseai_error::{ExternalFailure, ExternalFailureKind, ExternalResult, TransientCategory};
use nurseai_rate_limit::retry_after;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument, warn};

/// Gemini REST API client.
///
/// Classifies every failure but never retries; pair it with
/// [`ResilientCaller`](crate::ResilientCaller).
#[derive(Clone)]
pub struct GeminiRestClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiRestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiRestClient {
    /// Creates a client using `GEMINI_API_KEY` from the environment.
    ///
    /// # Errors
    ///
    /// Returns a permanent failure if the key is not set or the HTTP client
    /// cannot be built.
    #[instrument(skip_all)]
    pub fn from_env(config: &ModelsConfig) -> ExternalResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|e| ExternalFailure::permanent(format!("GEMINI_API_KEY not set: {}", e)))?;
        Self::with_api_key(api_key, config)
    }

    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns a permanent failure if the key is blank or the HTTP client
    /// cannot be built.
    #[instrument(skip_all, fields(base_url = %config.api_base_url()))]
    pub fn with_api_key(api_key: impl Into<String>, config: &ModelsConfig) -> ExternalResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ExternalFailure::permanent("Gemini API key is empty"));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                ExternalFailure::permanent(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
        })
    }

    /// Turn a non-success response into a classified failure.
    async fn classify(response: Response, model: Option<&str>) -> ExternalFailure {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                let hint = retry_after::detect(&headers, &body, Utc::now());
                debug!(?hint, "Gemini rate limited the request");
                ExternalFailure::transient(TransientCategory::RateLimited, hint)
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                let hint = retry_after::detect(&headers, &body, Utc::now());
                debug!(?hint, "Gemini is overloaded");
                ExternalFailure::transient(TransientCategory::Overloaded, hint)
            }
            StatusCode::NOT_FOUND => ExternalFailure::new(ExternalFailureKind::ModelUnavailable(
                model.unwrap_or("unknown").to_string(),
            )),
            _ => {
                let message = serde_json::from_str::<ErrorEnvelope>(&body)
                    .ok()
                    .and_then(|envelope| envelope.error.message)
                    .unwrap_or(body);
                warn!(status = status.as_u16(), "Gemini request failed permanently");
                ExternalFailure::permanent(format!("Gemini API error {}: {}", status.as_u16(), message))
            }
        }
    }

    fn transport_failure(e: reqwest::Error) -> ExternalFailure {
        ExternalFailure::permanent(format!("Request to Gemini failed: {}", e))
    }
}

#[async_trait]
impl GenerativeService for GeminiRestClient {
    #[instrument(skip(self))]
    async fn list_models(&self) -> ExternalResult<Vec<ModelInfo>> {
        let url = format!("{}/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("key", self.api_key.clone())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(&url)
                .query(&query)
                .send()
                .await
                .map_err(Self::transport_failure)?;

            if !response.status().is_success() {
                return Err(Self::classify(response, None).await);
            }

            let page: ListModelsResponse = response.json().await.map_err(|e| {
                ExternalFailure::permanent(format!("Failed to parse model list: {}", e))
            })?;
            models.extend(page.models);

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = models.len(), "Listed Gemini models");
        Ok(models)
    }

    #[instrument(skip(self, request), fields(target_id = %request.target_id()))]
    async fn generate(
        &self,
        model: &str,
        request: &OutboundRequest,
    ) -> ExternalResult<GenerateResponse> {
        let model = normalize_model_name(model);
        let url = format!("{}/{}:generateContent", self.base_url, model);
        let body = GenerateContentRequest::from(request.contents().as_slice());

        debug!(model = %model, turns = request.contents().len(), "Sending Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_failure)?;

        if !response.status().is_success() {
            return Err(Self::classify(response, Some(&model)).await);
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            ExternalFailure::permanent(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = parsed
            .text()
            .ok_or_else(|| ExternalFailure::permanent("Gemini returned no text"))?;

        Ok(GenerateResponse::new(text, model))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
