//! Durable storage for the single retry ticket.

use crate::RetryTicket;
use nurseai_error::{NurseAiResult, RetryTicketError, RetryTicketErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

/// File name of the ticket inside the platform data directory.
pub const TICKET_FILE_NAME: &str = "gemini_retry.json";

/// A single well-known slot holding at most one ticket.
#[async_trait::async_trait]
pub trait TicketStore: Send + Sync + std::fmt::Debug {
    /// Read the stored ticket, if any.
    async fn load(&self) -> NurseAiResult<Option<RetryTicket>>;

    /// Replace the stored ticket.
    async fn save(&self, ticket: &RetryTicket) -> NurseAiResult<()>;

    /// Remove the stored ticket. Clearing an empty slot succeeds.
    async fn clear(&self) -> NurseAiResult<()>;
}

/// Ticket kept as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileTicketStore {
    path: PathBuf,
}

impl FileTicketStore {
    /// Store the ticket at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/nurseai/gemini_retry.json`, relative to the working
    /// directory when the platform has no data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nurseai")
            .join(TICKET_FILE_NAME)
    }

    /// Use `path` if given, otherwise [`default_path`](Self::default_path).
    pub fn at_or_default(path: Option<&Path>) -> Self {
        Self::new(path.map(Path::to_path_buf).unwrap_or_else(Self::default_path))
    }

    /// Location of the ticket file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl TicketStore for FileTicketStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> NurseAiResult<Option<RetryTicket>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RetryTicketError::new(RetryTicketErrorKind::Load(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
                .into());
            }
        };

        let ticket = serde_json::from_slice(&data).map_err(|e| {
            RetryTicketError::new(RetryTicketErrorKind::Load(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;
        Ok(Some(ticket))
    }

    #[instrument(skip(self, ticket), fields(path = %self.path.display(), target_id = %ticket.target_id()))]
    async fn save(&self, ticket: &RetryTicket) -> NurseAiResult<()> {
        let save_error = |e: String| {
            RetryTicketError::new(RetryTicketErrorKind::Save(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| save_error(e.to_string()))?;
        }

        let json = serde_json::to_vec_pretty(ticket).map_err(|e| save_error(e.to_string()))?;
        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| save_error(e.to_string()))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| save_error(e.to_string()))?;

        debug!("Saved retry ticket");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn clear(&self) -> NurseAiResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Cleared retry ticket");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RetryTicketError::new(RetryTicketErrorKind::Clear(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
            .into()),
        }
    }
}

/// Ticket kept in memory; clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTicketStore {
    slot: Arc<Mutex<Option<RetryTicket>>>,
}

impl MemoryTicketStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `ticket`.
    pub fn with_ticket(ticket: RetryTicket) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(ticket))),
        }
    }
}

#[async_trait::async_trait]
impl TicketStore for MemoryTicketStore {
    async fn load(&self) -> NurseAiResult<Option<RetryTicket>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, ticket: &RetryTicket) -> NurseAiResult<()> {
        *self.slot.lock().await = Some(ticket.clone());
        Ok(())
    }

    async fn clear(&self) -> NurseAiResult<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
