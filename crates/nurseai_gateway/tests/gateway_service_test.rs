//! Outcome classification and conversation shape of the gateway façade.

mod test_utils;

use nurseai_core::{
    GenerationContext, GenerationOutcome, Part, RetryPolicyConfig, RetryPolicyConfigBuilder, Role,
    TargetId,
};
use nurseai_gateway::{CaptureMedia, MediaAttachment};
use std::sync::Arc;
use test_utils::{MockResponse, MockService, SUGGESTION_WITH_GAPS, gateway_with};

fn media() -> CaptureMedia {
    CaptureMedia::audio(MediaAttachment::new("audio/m4a", b"recording".to_vec()))
}

fn context() -> GenerationContext {
    GenerationContext::new(Some("MRN-7".to_string()), Some("Asha".to_string()))
}

#[tokio::test(start_paused = true)]
async fn test_initial_success_builds_record() -> anyhow::Result<()> {
    let mock = Arc::new(MockService::new_success(SUGGESTION_WITH_GAPS));
    let gateway = gateway_with(mock.clone(), RetryPolicyConfig::default());
    let target = TargetId::from("cap-1");

    let outcome = gateway.generate_initial(&target, &media(), &context()).await;
    let record = outcome.into_success().expect("success");
    assert_eq!(record.target_id(), &target);
    assert_eq!(record.content(), SUGGESTION_WITH_GAPS);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let contents = requests[0].contents();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].role, Role::User);
    assert_eq!(
        contents[0].parts[0].as_text(),
        Some("Clinical prompt\n\nPatient ID: MRN-7\n")
    );
    assert!(matches!(&contents[0].parts[1], Part::InlineData { data, .. } if data == b"recording"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_rate_limit_is_a_distinct_outcome() {
    let mock = Arc::new(MockService::new_sequence(vec![MockResponse::rate_limited(
        Some(90),
    )]));
    let gateway = gateway_with(mock.clone(), RetryPolicyConfig::default());

    let outcome = gateway
        .generate_initial(&TargetId::from("cap-1"), &media(), &context())
        .await;

    assert_eq!(
        outcome,
        GenerationOutcome::RateLimited {
            retry_after_seconds: 90
        }
    );
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_without_hint_reports_at_least_a_minute() -> anyhow::Result<()> {
    let mock = Arc::new(MockService::new_sequence(vec![MockResponse::rate_limited(
        None,
    )]));
    let policy = RetryPolicyConfigBuilder::default()
        .max_retries(1u32)
        .build()?;
    let gateway = gateway_with(mock, policy);

    match gateway
        .generate_initial(&TargetId::from("cap-1"), &media(), &context())
        .await
    {
        GenerationOutcome::RateLimited {
            retry_after_seconds,
        } => assert!(retry_after_seconds >= 60),
        other => panic!("expected rate limit, got {other:?}"),
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_permanent_failure_is_not_retried() {
    let mock = Arc::new(MockService::new_sequence(vec![MockResponse::permanent(
        "API key not valid",
    )]));
    let gateway = gateway_with(mock.clone(), RetryPolicyConfig::default());

    let outcome = gateway
        .generate_initial(&TargetId::from("cap-1"), &media(), &context())
        .await;

    match outcome {
        GenerationOutcome::PermanentError { message } => {
            assert!(message.contains("API key not valid"))
        }
        other => panic!("expected permanent error, got {other:?}"),
    }
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_followup_sends_prior_content_as_model_turn() {
    let mock = Arc::new(MockService::new_success("8. Missing Data\nBP"));
    let gateway = gateway_with(mock.clone(), RetryPolicyConfig::default());

    let outcome = gateway
        .generate_followup(
            &TargetId::from("cap-1"),
            SUGGESTION_WITH_GAPS,
            "SpO2: 97%\nHR: 88",
            &context(),
        )
        .await;
    assert_eq!(outcome, GenerationOutcome::success("8. Missing Data\nBP".to_string()));

    let requests = mock.requests();
    let contents = requests[0].contents();
    let roles: Vec<Role> = contents.iter().map(|c| c.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::User]);
    assert_eq!(contents[1].parts[0].as_text(), Some(SUGGESTION_WITH_GAPS));
    let message = contents[2].parts[0].as_text().unwrap_or_default();
    assert!(message.starts_with("SpO2: 97%\nHR: 88\n\n"));
    assert!(message.contains("update section 8"));
}

#[tokio::test(start_paused = true)]
async fn test_followup_rate_limit_passes_through() {
    let mock = Arc::new(MockService::new_sequence(vec![MockResponse::rate_limited(
        Some(120),
    )]));
    let gateway = gateway_with(mock, RetryPolicyConfig::default());

    let outcome = gateway
        .generate_followup(&TargetId::from("cap-1"), "prior", "Age: 40", &context())
        .await;
    assert!(outcome.is_rate_limited());
}
