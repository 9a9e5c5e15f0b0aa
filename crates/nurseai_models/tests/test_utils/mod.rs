//! Test utilities for NurseAI model tests.
//!
//! This module provides a scripted mock service and request helpers.

use nurseai_core::{Content, OutboundRequest, Part, Role, TargetId};

pub mod mock_service;

#[allow(unused_imports)]
pub use mock_service::{MockCall, MockResponse, MockService};

/// Helper to create a text-only request for a target.
#[allow(dead_code)]
pub fn create_test_request(target: &str, prompt: &str) -> OutboundRequest {
    OutboundRequest::new(
        TargetId::from(target),
        vec![Content::new(
            Role::User,
            vec![
                Part::Text(prompt.to_string()),
                Part::InlineData {
                    mime_type: "audio/m4a".to_string(),
                    data: b"fake-audio".to_vec(),
                },
            ],
        )],
    )
}
