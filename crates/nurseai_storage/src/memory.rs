//! In-process repositories.

use crate::{CaptureRepository, SuggestionRepository};
use nurseai_core::{CaptureRecord, SuggestionRecord, TargetId};
use nurseai_error::{NurseAiResult, StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Capture repository held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCaptureRepository {
    captures: Arc<RwLock<HashMap<TargetId, CaptureRecord>>>,
}

impl MemoryCaptureRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored captures.
    pub async fn len(&self) -> usize {
        self.captures.read().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.captures.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl CaptureRepository for MemoryCaptureRepository {
    #[tracing::instrument(skip(self, capture), fields(target_id = %capture.id()))]
    async fn insert(&self, capture: CaptureRecord) -> NurseAiResult<()> {
        self.captures
            .write()
            .await
            .insert(capture.id().clone(), capture);
        Ok(())
    }

    async fn get(&self, target_id: &TargetId) -> NurseAiResult<Option<CaptureRecord>> {
        Ok(self.captures.read().await.get(target_id).cloned())
    }

    async fn update(&self, capture: CaptureRecord) -> NurseAiResult<()> {
        let mut captures = self.captures.write().await;
        match captures.get_mut(capture.id()) {
            Some(slot) => {
                *slot = capture;
                Ok(())
            }
            None => Err(StorageError::new(StorageErrorKind::NotFound(format!(
                "capture {}",
                capture.id()
            )))
            .into()),
        }
    }
}

#[derive(Debug, Default)]
struct SuggestionTable {
    by_id: HashMap<String, SuggestionRecord>,
    // insertion order per target, oldest first
    by_target: HashMap<TargetId, Vec<String>>,
}

/// Suggestion repository held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySuggestionRepository {
    table: Arc<RwLock<SuggestionTable>>,
}

impl MemorySuggestionRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored suggestions.
    pub async fn len(&self) -> usize {
        self.table.read().await.by_id.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.by_id.is_empty()
    }
}

#[async_trait::async_trait]
impl SuggestionRepository for MemorySuggestionRepository {
    #[tracing::instrument(skip(self, suggestion), fields(id = %suggestion.id(), target_id = %suggestion.target_id()))]
    async fn insert(&self, suggestion: SuggestionRecord) -> NurseAiResult<()> {
        let mut table = self.table.write().await;
        let id = suggestion.id().clone();
        let ids = table
            .by_target
            .entry(suggestion.target_id().clone())
            .or_default();
        ids.retain(|existing| existing != &id);
        ids.push(id.clone());
        table.by_id.insert(id, suggestion);
        Ok(())
    }

    async fn get(&self, id: &str) -> NurseAiResult<Option<SuggestionRecord>> {
        Ok(self.table.read().await.by_id.get(id).cloned())
    }

    #[tracing::instrument(skip(self, suggestion), fields(id = %suggestion.id()))]
    async fn update(&self, suggestion: SuggestionRecord) -> NurseAiResult<()> {
        let mut table = self.table.write().await;
        match table.by_id.get_mut(suggestion.id()) {
            Some(slot) => {
                *slot = suggestion;
                Ok(())
            }
            None => Err(StorageError::new(StorageErrorKind::NotFound(format!(
                "suggestion {}",
                suggestion.id()
            )))
            .into()),
        }
    }

    async fn latest_for_target(
        &self,
        target_id: &TargetId,
    ) -> NurseAiResult<Option<SuggestionRecord>> {
        let table = self.table.read().await;
        Ok(table
            .by_target
            .get(target_id)
            .and_then(|ids| ids.last())
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }
}
