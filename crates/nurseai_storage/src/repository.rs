//! Record persistence traits.

use nurseai_core::{CaptureRecord, SuggestionRecord, TargetId};
use nurseai_error::NurseAiResult;

/// Persistence for captures, the records suggestions are generated from.
#[async_trait::async_trait]
pub trait CaptureRepository: Send + Sync {
    /// Store a new capture, replacing any capture with the same id.
    async fn insert(&self, capture: CaptureRecord) -> NurseAiResult<()>;

    /// Look up a capture by target id.
    async fn get(&self, target_id: &TargetId) -> NurseAiResult<Option<CaptureRecord>>;

    /// Replace an existing capture.
    ///
    /// # Errors
    ///
    /// Returns `StorageErrorKind::NotFound` if no capture has that id.
    async fn update(&self, capture: CaptureRecord) -> NurseAiResult<()>;
}

/// Persistence for generated suggestions.
///
/// A target may accumulate several suggestions (one per successful initial
/// generation); [`latest_for_target`](Self::latest_for_target) returns the
/// most recent one.
#[async_trait::async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// Store a new suggestion.
    async fn insert(&self, suggestion: SuggestionRecord) -> NurseAiResult<()>;

    /// Look up a suggestion by its own id.
    async fn get(&self, id: &str) -> NurseAiResult<Option<SuggestionRecord>>;

    /// Replace an existing suggestion in place.
    ///
    /// # Errors
    ///
    /// Returns `StorageErrorKind::NotFound` if no suggestion has that id.
    async fn update(&self, suggestion: SuggestionRecord) -> NurseAiResult<()>;

    /// The most recently inserted suggestion for a target.
    async fn latest_for_target(
        &self,
        target_id: &TargetId,
    ) -> NurseAiResult<Option<SuggestionRecord>>;
}
