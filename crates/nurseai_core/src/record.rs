//! Persisted records.

use crate::TargetId;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated clinical suggestion, persisted once per successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SuggestionRecord {
    /// Unique suggestion id
    id: String,
    /// Capture the suggestion belongs to
    target_id: TargetId,
    /// Generated text
    content: String,
    /// When the text was (last) generated
    generated_at: DateTime<Utc>,
}

impl SuggestionRecord {
    /// Create a record with a fresh id, stamped now.
    pub fn new(target_id: TargetId, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target_id,
            content: content.into(),
            generated_at: Utc::now(),
        }
    }

    /// Replace the content after a follow-up, restamping the record.
    pub fn revise(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.generated_at = Utc::now();
    }
}

/// A clinical capture: the recording and photo a suggestion is generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CaptureRecord {
    /// Capture id; doubles as the generation target
    id: TargetId,
    /// Patient identifier as entered by the clinician
    patient_id: Option<String>,
    /// Patient display name
    patient_name: Option<String>,
    /// Content-addressed key of the audio recording
    audio_key: Option<String>,
    /// MIME type of the audio recording
    audio_mime: Option<String>,
    /// Content-addressed key of the photo
    photo_key: Option<String>,
    /// MIME type of the photo
    photo_mime: Option<String>,
    /// When the capture was stored
    created_at: DateTime<Utc>,
}

impl CaptureRecord {
    /// Create an empty capture for a patient.
    pub fn new(patient_id: Option<String>, patient_name: Option<String>) -> Self {
        Self {
            id: TargetId::new(Uuid::new_v4().to_string()),
            patient_id,
            patient_name,
            audio_key: None,
            audio_mime: None,
            photo_key: None,
            photo_mime: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the stored audio recording.
    pub fn with_audio(mut self, key: impl Into<String>, mime: impl Into<String>) -> Self {
        self.audio_key = Some(key.into());
        self.audio_mime = Some(mime.into());
        self
    }

    /// Attach the stored photo.
    pub fn with_photo(mut self, key: impl Into<String>, mime: impl Into<String>) -> Self {
        self.photo_key = Some(key.into());
        self.photo_mime = Some(mime.into());
        self
    }
}
