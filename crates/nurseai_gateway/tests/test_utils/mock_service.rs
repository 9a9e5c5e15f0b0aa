//! Scripted mock of the external generative service that keeps every request.

use async_trait::async_trait;
use nurseai_core::{GenerateResponse, ModelInfo, OutboundRequest};
use nurseai_error::{ExternalFailure, ExternalFailureKind, ExternalResult, TransientCategory};
use nurseai_models::GenerativeService;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

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

    /// Any non-retryable failure.
    pub fn permanent(message: &str) -> Self {
        Self::Failure(ExternalFailureKind::Permanent(message.to_string()))
    }
}

/// Mock service replaying a script; the last entry repeats.
pub struct MockService {
    script: Mutex<VecDeque<MockResponse>>,
    last: Mutex<Option<MockResponse>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

#[allow(dead_code)]
impl MockService {
    /// Always succeed with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_sequence(vec![MockResponse::Success(text.into())])
    }

    /// Replay `responses` in order, then repeat the last one.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of generate calls so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
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
        Ok(vec![ModelInfo::new(
            "models/gemini-1.5-flash",
            ["generateContent"],
        )])
    }

    async fn generate(
        &self,
        model: &str,
        request: &OutboundRequest,
    ) -> ExternalResult<GenerateResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match self.next_response() {
            MockResponse::Success(text) => Ok(GenerateResponse::new(text, model)),
            MockResponse::Failure(kind) => Err(ExternalFailure::new(kind)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
