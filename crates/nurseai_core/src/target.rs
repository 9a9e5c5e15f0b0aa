//! Opaque reference to the clinical record a request is about.

use serde::{Deserialize, Serialize};

/// Identifier of the capture (clinical record) a generation targets.
///
/// # Examples
///
/// ```
/// use nurseai_core::TargetId;
///
/// let id = TargetId::from("rec-42");
/// assert_eq!(id.to_string(), "rec-42");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Create a target id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
