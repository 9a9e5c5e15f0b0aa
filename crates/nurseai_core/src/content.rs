//! Multimodal conversation content.

use crate::Role;
use serde::{Deserialize, Serialize};

/// One piece of a conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Part {
    /// Plain text
    Text(String),
    /// Binary media sent inline (audio recording, photo)
    InlineData {
        /// MIME type of the bytes, e.g. `audio/m4a`
        mime_type: String,
        /// Raw media bytes
        data: Vec<u8>,
    },
}

impl Part {
    /// The text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::InlineData { .. } => None,
        }
    }
}

/// A single conversation turn.
///
/// # Examples
///
/// ```
/// use nurseai_core::{Content, Part, Role};
///
/// let turn = Content::text(Role::User, "Patient ID: 17");
/// assert_eq!(turn.role, Role::User);
/// assert_eq!(turn.parts, vec![Part::Text("Patient ID: 17".to_string())]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Who produced this turn
    pub role: Role,
    /// The turn's parts, in order
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a turn from parts.
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// Create a turn holding a single text part.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// True if any part carries binary media.
    pub fn has_media(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, Part::InlineData { .. }))
    }
}
