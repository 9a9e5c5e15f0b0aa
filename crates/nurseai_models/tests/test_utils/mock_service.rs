//! Scripted mock of the external generative service.

use async_trait::async_trait;
use nurseai_core::{GenerateResponse, ModelInfo, OutboundRequest};
use nurseai_error::{ExternalFailure, ExternalFailureKind, ExternalResult, TransientCategory};
use nurseai_models::GenerativeService;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// A single scripted generate response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Failure(ExternalFailureKind),
}

#[allow(dead_code)]
impl MockResponse {
    /// HTTP 429, optionally with a Retry-After hint in seconds.
    pub fn rate_limited(hint_secs: Option<u64>) -> Self {
        Self::Failure(ExternalFailureKind::Transient {
            category: TransientCategory::RateLimited,
            retry_after: hint_secs.map(Duration::from_secs),
        })
    }

    /// HTTP 503 without a hint.
    pub fn overloaded() -> Self {
        Self::Failure(ExternalFailureKind::Transient {
            category: TransientCategory::Overloaded,
            retry_after: None,
        })
    }

    /// HTTP 404 for the given model.
    pub fn not_found(model: &str) -> Self {
        Self::Failure(ExternalFailureKind::ModelUnavailable(model.to_string()))
    }

    /// Any non-retryable failure.
    pub fn permanent(message: &str) -> Self {
        Self::Failure(ExternalFailureKind::Permanent(message.to_string()))
    }
}

/// A recorded generate call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub model: String,
    pub target_id: String,
    pub at: Instant,
}

/// Mock service replaying a script of responses.
///
/// Once the script is exhausted the last entry repeats, so a single-entry
/// script behaves as "always".
pub struct MockService {
    script: Mutex<VecDeque<MockResponse>>,
    last: Mutex<Option<MockResponse>>,
    models: Vec<ModelInfo>,
    calls: Mutex<Vec<MockCall>>,
    list_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockService {
    /// Always succeed with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_sequence(vec![MockResponse::Success(text.into())])
    }

    /// Always return `response`.
    pub fn new_always(response: MockResponse) -> Self {
        Self::new_sequence(vec![response])
    }

    /// Replay `responses` in order, then repeat the last one.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            last: Mutex::new(None),
            models: vec![
                ModelInfo::new("models/gemini-1.5-flash", ["generateContent"]),
                ModelInfo::new("models/gemini-1.5-pro", ["generateContent"]),
            ],
            calls: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Replace the model listing.
    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    /// Number of generate calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every generate call so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of list_models calls so far.
    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> MockResponse {
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(response) => {
                *last = Some(response.clone());
                response
            }
            None => last
                .clone()
                .unwrap_or_else(|| MockResponse::permanent("mock script is empty")),
        }
    }
}

#[async_trait]
impl GenerativeService for MockService {
    async fn list_models(&self) -> ExternalResult<Vec<ModelInfo>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.models.clone())
    }

    async fn generate(
        &self,
        model: &str,
        request: &OutboundRequest,
    ) -> ExternalResult<GenerateResponse> {
        self.calls.lock().unwrap().push(MockCall {
            model: model.to_string(),
            target_id: request.target_id().to_string(),
            at: Instant::now(),
        });

        match self.next_response() {
            MockResponse::Success(text) => Ok(GenerateResponse::new(text, model)),
            MockResponse::Failure(kind) => Err(ExternalFailure::new(kind)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
