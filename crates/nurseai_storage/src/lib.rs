//! Storage collaborators for the NurseAI gateway.
//!
//! Two concerns live here:
//!
//! - **Media**: uploaded recordings and photos are kept in a
//!   content-addressed store ([`MediaStore`]). Storing returns a
//!   [`MediaHandle`] whose key reads the same bytes back later.
//! - **Records**: captures and generated suggestions are kept behind small
//!   repository traits keyed by target id ([`CaptureRepository`],
//!   [`SuggestionRepository`]).
//!
//! # Example
//!
//! ```rust
//! use nurseai_storage::{FileSystemMediaStore, MediaStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let store = FileSystemMediaStore::new(dir.path())?;
//!
//! let handle = store.store(b"RIFF....WAVE", "audio/wav").await?;
//! let bytes = store.retrieve(handle.key()).await?;
//! assert_eq!(bytes, b"RIFF....WAVE");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod media;
mod memory;
mod repository;

pub use filesystem::FileSystemMediaStore;
pub use media::{MediaHandle, MediaKind, MediaStore};
pub use memory::{MemoryCaptureRepository, MemorySuggestionRepository};
pub use nurseai_error::{StorageError, StorageErrorKind};
pub use repository::{CaptureRepository, SuggestionRepository};
