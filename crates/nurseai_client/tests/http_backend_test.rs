//! The HTTP backend against a stubbed gateway.

use nurseai_client::{GenerationBackend, HttpGenerationBackend};
use nurseai_core::{GenerationOutcome, SuggestionRecord, TargetId};
use nurseai_error::NurseAiErrorKind;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_success_outcome() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let record = SuggestionRecord::new(TargetId::from("cap-1"), "1. Summary");
    Mock::given(method("POST"))
        .and(path("/api/records/cap-1/suggestion"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(GenerationOutcome::success(record.clone())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpGenerationBackend::new(format!("{}/", server.uri()))?;
    let outcome = backend.generate(&TargetId::from("cap-1")).await?;
    assert_eq!(outcome, GenerationOutcome::success(record));
    Ok(())
}

#[tokio::test]
async fn test_rate_limited_outcome_from_429() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/records/cap-1/suggestion"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "90")
                .set_body_json(json!({"status": "rate_limited", "retry_after_seconds": 90})),
        )
        .mount(&server)
        .await;

    let backend = HttpGenerationBackend::new(server.uri())?;
    let outcome = backend.generate(&TargetId::from("cap-1")).await?;
    assert_eq!(
        outcome,
        GenerationOutcome::RateLimited {
            retry_after_seconds: 90
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_permanent_outcome_from_404() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/records/gone/suggestion"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"status": "permanent_error", "message": "Capture gone not found"})),
        )
        .mount(&server)
        .await;

    let backend = HttpGenerationBackend::new(server.uri())?;
    let outcome = backend.generate(&TargetId::from("gone")).await?;
    assert_eq!(outcome, GenerationOutcome::permanent("Capture gone not found"));
    Ok(())
}

#[tokio::test]
async fn test_non_outcome_body_is_an_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let backend = HttpGenerationBackend::new(server.uri())?;
    let err = backend
        .generate(&TargetId::from("cap-1"))
        .await
        .expect_err("html is not an outcome");
    assert!(matches!(err.kind(), NurseAiErrorKind::RetryTicket(_)));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_is_http_error() -> anyhow::Result<()> {
    // Bind then release a port so nothing is listening on it
    let port = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();

    let backend = HttpGenerationBackend::new(format!("http://127.0.0.1:{port}"))?;
    let err = backend
        .generate(&TargetId::from("cap-1"))
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err.kind(), NurseAiErrorKind::Http(_)));
    Ok(())
}
