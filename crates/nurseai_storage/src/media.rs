//! Media store trait and handle types.

use derive_getters::Getters;
use nurseai_error::NurseAiResult;
use serde::{Deserialize, Serialize};

/// Broad category of an uploaded file, used to group files on disk.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Photos (`image/*`)
    Image,
    /// Recordings (`audio/*`)
    Audio,
    /// Anything else
    Other,
}

impl MediaKind {
    /// Categorise a MIME type.
    ///
    /// ```
    /// use nurseai_storage::MediaKind;
    ///
    /// assert_eq!(MediaKind::from_mime("audio/m4a"), MediaKind::Audio);
    /// assert_eq!(MediaKind::from_mime("IMAGE/JPEG"), MediaKind::Image);
    /// assert_eq!(MediaKind::from_mime("application/pdf"), MediaKind::Other);
    /// ```
    pub fn from_mime(mime_type: &str) -> Self {
        let top = mime_type
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match top.as_str() {
            "image" => Self::Image,
            "audio" => Self::Audio,
            _ => Self::Other,
        }
    }
}

/// Readable handle for stored bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MediaHandle {
    /// Store key, `{kind}/{sha256}`
    key: String,
    /// SHA-256 of the content
    content_hash: String,
    /// MIME type supplied at upload
    mime_type: String,
    /// Media category
    kind: MediaKind,
    /// Size in bytes
    size_bytes: u64,
}

impl MediaHandle {
    /// Build a handle for content with the given hash.
    pub fn new(content_hash: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        let content_hash = content_hash.into();
        let mime_type = mime_type.into();
        let kind = MediaKind::from_mime(&mime_type);
        Self {
            key: format!("{}/{}", kind, content_hash),
            content_hash,
            mime_type,
            kind,
            size_bytes,
        }
    }
}

/// Pluggable binary storage for uploaded media.
///
/// Implementations must deduplicate by content: storing the same bytes twice
/// returns the same key.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Store bytes and return the handle that reads them back.
    async fn store(&self, data: &[u8], mime_type: &str) -> NurseAiResult<MediaHandle>;

    /// Read previously stored bytes by key.
    async fn retrieve(&self, key: &str) -> NurseAiResult<Vec<u8>>;

    /// Whether bytes are stored under `key`.
    async fn exists(&self, key: &str) -> NurseAiResult<bool>;
}
