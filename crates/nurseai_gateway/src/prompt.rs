//! Clinical prompt and conversation assembly.

use nurseai_core::{Content, GenerationContext, Part, Role};
use nurseai_error::{ConfigError, NurseAiResult};
use std::path::Path;

const BUNDLED_PROMPT: &str = include_str!("../prompts/clinical.txt");

const FOLLOWUP_INSTRUCTION: &str = "Please update the response using the same structure. \
     If missing data is now provided, update section 8 accordingly.";

/// Binary evidence attached to an initial generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    /// MIME type sent to the service
    pub mime_type: String,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl MediaAttachment {
    /// Create an attachment.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }
}

impl From<MediaAttachment> for Part {
    fn from(media: MediaAttachment) -> Self {
        Part::InlineData {
            mime_type: media.mime_type,
            data: media.data,
        }
    }
}

/// The recording and optional photo a suggestion is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureMedia {
    /// Audio recording of the consultation
    pub audio: MediaAttachment,
    /// Optional photo of the patient or document
    pub photo: Option<MediaAttachment>,
}

impl CaptureMedia {
    /// Media with just a recording.
    pub fn audio(audio: MediaAttachment) -> Self {
        Self { audio, photo: None }
    }

    /// Attach a photo.
    pub fn with_photo(mut self, photo: MediaAttachment) -> Self {
        self.photo = Some(photo);
        self
    }
}

/// The instruction text sent ahead of every generation.
///
/// # Examples
///
/// ```
/// use nurseai_core::GenerationContext;
/// use nurseai_gateway::PromptTemplate;
///
/// let prompt = PromptTemplate::new("Summarise the case.");
/// let text = prompt.render(&GenerationContext::new(None, None));
/// assert_eq!(text, "Summarise the case.\n\nPatient ID: Unknown\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::bundled()
    }
}

impl PromptTemplate {
    /// Use custom instruction text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim_end().to_string(),
        }
    }

    /// The clinical decision support prompt shipped with the crate.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_PROMPT)
    }

    /// Load instruction text from a file.
    pub fn from_file(path: impl AsRef<Path>) -> NurseAiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("Failed to read prompt {}: {}", path.display(), e))
        })?;
        if text.trim().is_empty() {
            return Err(ConfigError::new(format!("Prompt {} is empty", path.display())).into());
        }
        Ok(Self::new(text))
    }

    /// The raw instruction text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Instruction text followed by the patient identifier.
    pub fn render(&self, context: &GenerationContext) -> String {
        let patient = context
            .patient_id()
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or("Unknown");
        format!("{}\n\nPatient ID: {}\n", self.text, patient)
    }

    /// Single user turn: prompt, recording, then photo if present.
    pub fn initial_contents(&self, media: &CaptureMedia, context: &GenerationContext) -> Vec<Content> {
        let mut parts = vec![
            Part::Text(self.render(context)),
            media.audio.clone().into(),
        ];
        if let Some(photo) = &media.photo {
            parts.push(photo.clone().into());
        }
        vec![Content::new(Role::User, parts)]
    }

    /// Three turns: the original prompt, the prior answer as the model's
    /// turn, then the clinician's new message with the update instruction.
    pub fn followup_contents(
        &self,
        prior_content: &str,
        message: &str,
        context: &GenerationContext,
    ) -> Vec<Content> {
        vec![
            Content::text(Role::User, self.render(context)),
            Content::text(Role::Model, prior_content),
            Content::text(Role::User, format!("{}\n\n{}", message, FOLLOWUP_INSTRUCTION)),
        ]
    }
}
