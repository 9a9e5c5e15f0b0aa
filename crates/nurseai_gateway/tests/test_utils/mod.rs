//! Test utilities for gateway tests.

pub mod mock_service;

use nurseai_core::RetryPolicyConfig;
use nurseai_gateway::{GatewayService, PromptTemplate};
use nurseai_models::{GenerativeService, ModelResolver, ResilientCaller};
use nurseai_rate_limit::RateGate;
use std::sync::Arc;
use std::time::Duration;

#[allow(unused_imports)]
pub use mock_service::{MockResponse, MockService};

/// A suggestion whose missing-data section lists SpO2, BP and HR.
#[allow(dead_code)]
pub const SUGGESTION_WITH_GAPS: &str = "1. Case Synthesis\nFever for 3 days.\n\n\
8. Missing Data\nSpO2 / BP / HR\n\nTone: concise";

/// A suggestion with nothing missing.
#[allow(dead_code)]
pub const COMPLETE_SUGGESTION: &str = "1. Case Synthesis\nFever for 3 days, BP 120/80.";

/// Gateway over `mock` with a one-second gate and the given retry policy.
#[allow(dead_code)]
pub fn gateway_with(mock: Arc<MockService>, policy: RetryPolicyConfig) -> GatewayService {
    let service: Arc<dyn GenerativeService> = mock;
    let resolver = Arc::new(ModelResolver::new(
        service.clone(),
        vec!["gemini-1.5-flash".to_string()],
        "generateContent",
    ));
    let caller = ResilientCaller::new(
        service,
        resolver,
        RateGate::new(Duration::from_secs(1)),
        policy,
    );
    GatewayService::new(Arc::new(caller)).with_prompt(PromptTemplate::new("Clinical prompt"))
}
