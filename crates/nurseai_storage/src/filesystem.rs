//! Filesystem-backed media store.
//!
//! Files are content-addressed by SHA-256:
//! `{base_path}/{kind}/{hash[0:2]}/{hash[2:4]}/{hash}`
//!
//! ```text
//! nurseai-media/
//! ├── audio/
//! │   └── 12/
//! │       └── 34/
//! │           └── 123456abcdef...  (recording)
//! └── image/
//!     └── ab/
//!         └── cd/
//!             └── abcdef123456...  (photo)
//! ```

use crate::{MediaHandle, MediaKind, MediaStore};
use nurseai_error::{NurseAiResult, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

/// Content-addressed media store rooted at a directory.
///
/// Writes go to a uniquely named temp file that is then renamed into place,
/// so concurrent uploads of the same bytes never observe a partial file.
#[derive(Debug, Clone)]
pub struct FileSystemMediaStore {
    base_path: PathBuf,
}

impl FileSystemMediaStore {
    /// Create a store, creating the base directory if needed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> NurseAiResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Opened media store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn path_for(&self, kind: MediaKind, hash: &str) -> PathBuf {
        self.base_path
            .join(kind.as_ref())
            .join(&hash[0..2])
            .join(&hash[2..4])
            .join(hash)
    }

    /// Split a key into its kind and hash, rejecting anything that could
    /// escape the base directory.
    fn parse_key(key: &str) -> NurseAiResult<(MediaKind, &str)> {
        let malformed =
            || StorageError::new(StorageErrorKind::NotFound(format!("malformed media key {key}")));

        let (kind, hash) = key.split_once('/').ok_or_else(malformed)?;
        let kind = MediaKind::from_str(kind).map_err(|_| malformed())?;
        if hash.len() != 64 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed().into());
        }
        Ok((kind, hash))
    }
}

#[async_trait::async_trait]
impl MediaStore for FileSystemMediaStore {
    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn store(&self, data: &[u8], mime_type: &str) -> NurseAiResult<MediaHandle> {
        let hash = Self::compute_hash(data);
        let handle = MediaHandle::new(hash.clone(), mime_type, data.len() as u64);
        let path = self.path_for(*handle.kind(), &hash);

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(key = %handle.key(), "Media already stored");
            return Ok(handle);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(key = %handle.key(), size = data.len(), "Stored media file");
        Ok(handle)
    }

    #[tracing::instrument(skip(self))]
    async fn retrieve(&self, key: &str) -> NurseAiResult<Vec<u8>> {
        let (kind, hash) = Self::parse_key(key)?;
        let path = self.path_for(kind, hash);

        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(key.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        let actual = Self::compute_hash(&data);
        if actual != hash {
            return Err(StorageError::new(StorageErrorKind::Integrity(format!(
                "expected {}, got {}",
                hash, actual
            )))
            .into());
        }

        tracing::debug!(key, size = data.len(), "Retrieved media file");
        Ok(data)
    }

    async fn exists(&self, key: &str) -> NurseAiResult<bool> {
        let (kind, hash) = Self::parse_key(key)?;
        Ok(tokio::fs::try_exists(self.path_for(kind, hash))
            .await
            .unwrap_or(false))
    }
}
