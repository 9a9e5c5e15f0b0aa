//! Backend HTTP API.
//!
//! Generation endpoints always answer with a `status`-tagged outcome body,
//! including their failures, so the client can tell a rate limit (which arms
//! its retry ticket) from everything else (which discards it).

use crate::{CaptureMedia, GatewayService, MediaAttachment};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use nurseai_core::{CaptureRecord, GenerationContext, GenerationOutcome, SuggestionRecord, TargetId};
use nurseai_error::{HttpError, NurseAiResult};
use nurseai_extraction::{MissingField, SuggestionExtractor};
use nurseai_storage::{CaptureRepository, MediaStore, SuggestionRepository};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Largest accepted upload per request.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct ApiState {
    gateway: GatewayService,
    extractor: Arc<SuggestionExtractor>,
    media: Arc<dyn MediaStore>,
    captures: Arc<dyn CaptureRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
}

impl ApiState {
    /// Assemble the state from its collaborators.
    pub fn new(
        gateway: GatewayService,
        extractor: Arc<SuggestionExtractor>,
        media: Arc<dyn MediaStore>,
        captures: Arc<dyn CaptureRepository>,
        suggestions: Arc<dyn SuggestionRepository>,
    ) -> Self {
        Self {
            gateway,
            extractor,
            media,
            captures,
            suggestions,
        }
    }

    /// Load a capture's stored media and generate its first suggestion,
    /// persisting it on success.
    #[instrument(skip(self, capture), fields(target_id = %capture.id()))]
    pub async fn generate_for_capture(
        &self,
        capture: &CaptureRecord,
    ) -> GenerationOutcome<SuggestionRecord> {
        let media = match self.load_media(capture).await {
            Ok(media) => media,
            Err(e) => {
                error!(error = %e, "Failed to load capture media");
                return GenerationOutcome::permanent(format!("Capture media unavailable: {e}"));
            }
        };

        let outcome = self
            .gateway
            .generate_initial(capture.id(), &media, &context_for(capture))
            .await;

        match outcome {
            GenerationOutcome::Success { value } => match self.suggestions.insert(value.clone()).await {
                Ok(()) => GenerationOutcome::success(value),
                Err(e) => {
                    error!(error = %e, "Failed to persist suggestion");
                    GenerationOutcome::permanent(format!("Failed to save suggestion: {e}"))
                }
            },
            other => other,
        }
    }

    async fn load_media(&self, capture: &CaptureRecord) -> NurseAiResult<CaptureMedia> {
        let (Some(audio_key), Some(audio_mime)) = (capture.audio_key(), capture.audio_mime()) else {
            return Err(nurseai_error::ValidationError::new("capture has no recording").into());
        };
        let audio = MediaAttachment::new(audio_mime.clone(), self.media.retrieve(audio_key).await?);
        let mut media = CaptureMedia::audio(audio);

        if let (Some(photo_key), Some(photo_mime)) = (capture.photo_key(), capture.photo_mime()) {
            let photo = self.media.retrieve(photo_key).await?;
            media = media.with_photo(MediaAttachment::new(photo_mime.clone(), photo));
        }
        Ok(media)
    }
}

fn context_for(capture: &CaptureRecord) -> GenerationContext {
    GenerationContext::new(capture.patient_id().clone(), capture.patient_name().clone())
}

/// Build the API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/captures", post(create_capture))
        .route(
            "/api/records/:target_id/suggestion",
            post(generate_suggestion).get(latest_suggestion),
        )
        .route("/api/suggestions/:id/followup", post(followup))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: ApiState, addr: &str) -> NurseAiResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| HttpError::new(format!("Failed to bind {addr}: {e}")))?;
    info!(addr, "Backend API listening");
    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| HttpError::new(format!("Server error: {e}")))?;
    Ok(())
}

/// Response to a capture upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResponse {
    /// Id of the stored capture, the target for later retries
    pub capture_id: TargetId,
    /// Result of the immediate generation attempt
    pub outcome: GenerationOutcome<SuggestionRecord>,
}

/// Latest suggestion with its missing fields recomputed from the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionView {
    /// The stored suggestion
    pub suggestion: SuggestionRecord,
    /// Fields the model could not determine
    pub missing: Vec<MissingField>,
}

/// Body of a follow-up request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FollowupRequest {
    /// New information or instruction from the clinician
    pub message: String,
}

/// Failure answered before any generation ran.
///
/// Rendered in the same shape as a permanent outcome.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({"status": "permanent_error", "message": self.message})),
        )
            .into_response()
    }
}

impl From<nurseai_error::NurseAiError> for ApiError {
    fn from(err: nurseai_error::NurseAiError) -> Self {
        error!(error = %err, "Request failed");
        Self::internal(err.to_string())
    }
}

/// Status code for an outcome, plus the `Retry-After` value on rate limits.
fn outcome_status<T>(success: StatusCode, outcome: &GenerationOutcome<T>) -> (StatusCode, Option<u64>) {
    match outcome {
        GenerationOutcome::Success { .. } => (success, None),
        GenerationOutcome::RateLimited {
            retry_after_seconds,
        } => (StatusCode::TOO_MANY_REQUESTS, Some(*retry_after_seconds)),
        GenerationOutcome::PermanentError { .. } => (StatusCode::BAD_GATEWAY, None),
    }
}

fn with_retry_after(mut response: Response, retry_after: Option<u64>) -> Response {
    if let Some(seconds) = retry_after
        && let Ok(value) = HeaderValue::from_str(&seconds.to_string())
    {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}

fn outcome_response<T: Serialize>(success: StatusCode, outcome: GenerationOutcome<T>) -> Response {
    let (status, retry_after) = outcome_status(success, &outcome);
    with_retry_after((status, Json(outcome)).into_response(), retry_after)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

#[derive(Default)]
struct Upload {
    audio: Option<(String, Vec<u8>)>,
    photo: Option<(String, Vec<u8>)>,
    patient_id: Option<String>,
    patient_name: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let mime = field.content_type().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" | "photo" => {
                let expected = if name == "audio" { "audio/" } else { "image/" };
                if !mime.starts_with(expected) {
                    return Err(ApiError::bad_request(format!("Invalid {name} file type: {mime}")));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?
                    .to_vec();
                if name == "audio" {
                    upload.audio = Some((mime, data));
                } else {
                    upload.photo = Some((mime, data));
                }
            }
            "patientId" | "patientName" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                let text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
                if name == "patientId" {
                    upload.patient_id = text;
                } else {
                    upload.patient_name = text;
                }
            }
            other => return Err(ApiError::bad_request(format!("Unexpected field: {other}"))),
        }
    }
    Ok(upload)
}

#[instrument(skip_all)]
async fn create_capture(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(multipart).await?;
    let Some((audio_mime, audio)) = upload.audio else {
        return Err(ApiError::bad_request("No audio file uploaded"));
    };

    let handle = state.media.store(&audio, &audio_mime).await?;
    let mut capture = CaptureRecord::new(upload.patient_id, upload.patient_name)
        .with_audio(handle.key().clone(), audio_mime);
    if let Some((photo_mime, photo)) = upload.photo {
        let handle = state.media.store(&photo, &photo_mime).await?;
        capture = capture.with_photo(handle.key().clone(), photo_mime);
    }
    state.captures.insert(capture.clone()).await?;
    info!(target_id = %capture.id(), "Stored capture");

    let outcome = state.generate_for_capture(&capture).await;
    let (status, retry_after) = outcome_status(StatusCode::CREATED, &outcome);
    let body = CaptureResponse {
        capture_id: capture.id().clone(),
        outcome,
    };
    Ok(with_retry_after((status, Json(body)).into_response(), retry_after))
}

#[instrument(skip_all, fields(target_id = %target_id))]
async fn generate_suggestion(
    State(state): State<ApiState>,
    Path(target_id): Path<String>,
) -> Result<Response, ApiError> {
    let target_id = TargetId::new(target_id);
    let Some(capture) = state.captures.get(&target_id).await? else {
        return Err(ApiError::not_found(format!("Capture {target_id} not found")));
    };

    let outcome = state.generate_for_capture(&capture).await;
    Ok(outcome_response(StatusCode::OK, outcome))
}

#[instrument(skip_all, fields(target_id = %target_id))]
async fn latest_suggestion(
    State(state): State<ApiState>,
    Path(target_id): Path<String>,
) -> Result<Json<SuggestionView>, ApiError> {
    let target_id = TargetId::new(target_id);
    let Some(suggestion) = state.suggestions.latest_for_target(&target_id).await? else {
        return Err(ApiError::not_found(format!("No suggestion for {target_id}")));
    };

    let missing = state
        .extractor
        .extract_missing(suggestion.content())
        .into_iter()
        .collect();
    Ok(Json(SuggestionView {
        suggestion,
        missing,
    }))
}

#[instrument(skip_all, fields(suggestion_id = %id))]
async fn followup(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(body): Json<FollowupRequest>,
) -> Result<Response, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::bad_request("Follow-up message is empty"));
    }
    let Some(mut suggestion) = state.suggestions.get(&id).await? else {
        return Err(ApiError::not_found(format!("Suggestion {id} not found")));
    };

    let context = match state.captures.get(suggestion.target_id()).await? {
        Some(capture) => context_for(&capture),
        None => {
            warn!(target_id = %suggestion.target_id(), "Capture missing for follow-up");
            GenerationContext::default()
        }
    };

    let outcome = state
        .gateway
        .generate_followup(
            suggestion.target_id(),
            suggestion.content(),
            &body.message,
            &context,
        )
        .await;

    let outcome = match outcome {
        GenerationOutcome::Success { value } => {
            suggestion.revise(value);
            state.suggestions.update(suggestion.clone()).await?;
            GenerationOutcome::success(suggestion)
        }
        GenerationOutcome::RateLimited {
            retry_after_seconds,
        } => GenerationOutcome::RateLimited {
            retry_after_seconds,
        },
        GenerationOutcome::PermanentError { message } => {
            GenerationOutcome::PermanentError { message }
        }
    };
    Ok(outcome_response(StatusCode::OK, outcome))
}
