//! Test utilities for the retry workflow.

use nurseai_client::{
    GenerationBackend, ManualClock, MemoryTicketStore, RetryCoordinator, TicketStore,
};
use nurseai_core::{ClientRetryConfig, GenerationOutcome, SuggestionRecord, TargetId};
use nurseai_error::{HttpError, NurseAiResult};
use nurseai_extraction::SuggestionExtractor;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted backend answer.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum BackendReply {
    Outcome(GenerationOutcome<SuggestionRecord>),
    Unreachable,
}

#[allow(dead_code)]
impl BackendReply {
    pub fn success(content: &str) -> Self {
        Self::Outcome(GenerationOutcome::success(SuggestionRecord::new(
            TargetId::from("cap-1"),
            content,
        )))
    }

    pub fn rate_limited(seconds: u64) -> Self {
        Self::Outcome(GenerationOutcome::RateLimited {
            retry_after_seconds: seconds,
        })
    }

    pub fn permanent(message: &str) -> Self {
        Self::Outcome(GenerationOutcome::permanent(message))
    }
}

/// Backend replaying a script; the last entry repeats.
#[derive(Debug)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<BackendReply>>,
    last: Mutex<Option<BackendReply>>,
    calls: AtomicUsize,
    delay: Duration,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn new(replies: Vec<BackendReply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Make every call take `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        _target_id: &TargetId,
    ) -> NurseAiResult<GenerationOutcome<SuggestionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = {
            let next = self.script.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            match next {
                Some(reply) => {
                    *last = Some(reply.clone());
                    reply
                }
                None => last
                    .clone()
                    .unwrap_or_else(|| BackendReply::permanent("script is empty")),
            }
        };

        match reply {
            BackendReply::Outcome(outcome) => Ok(outcome),
            BackendReply::Unreachable => Err(HttpError::new("connection refused").into()),
        }
    }
}

/// Everything a coordinator test needs.
#[allow(dead_code)]
pub struct Fixture {
    pub coordinator: Arc<RetryCoordinator>,
    pub backend: Arc<ScriptedBackend>,
    pub store: MemoryTicketStore,
    pub clock: ManualClock,
}

#[allow(dead_code)]
pub fn fixture(backend: ScriptedBackend) -> Fixture {
    fixture_with_store(backend, MemoryTicketStore::new())
}

#[allow(dead_code)]
pub fn fixture_with_store(backend: ScriptedBackend, store: MemoryTicketStore) -> Fixture {
    let backend = Arc::new(backend);
    let clock = ManualClock::default();
    let store_dyn: Arc<dyn TicketStore> = Arc::new(store.clone());
    let coordinator = RetryCoordinator::new(
        backend.clone(),
        store_dyn,
        Arc::new(clock.clone()),
        Arc::new(SuggestionExtractor::bundled().expect("bundled keyword table")),
        ClientRetryConfig::default(),
    );
    Fixture {
        coordinator: Arc::new(coordinator),
        backend,
        store,
        clock,
    }
}
