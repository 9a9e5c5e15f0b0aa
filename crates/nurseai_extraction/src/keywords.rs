//! Data-driven keyword table for missing-field detection.

use crate::MissingField;
use derive_getters::Getters;
use nurseai_error::{ConfigError, NurseAiError, NurseAiResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

const BUNDLED_KEYWORDS: &str = include_str!("../keywords.toml");

/// Markers delimiting the missing-data section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SectionMarkers {
    /// Heading text following the section number, e.g. `missing data`
    heading: String,
    /// Texts that close the section, e.g. `tone:`
    #[serde(default)]
    closing: Vec<String>,
}

/// Keywords that report one field as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct FieldKeywords {
    /// Field reported when a keyword matches
    key: MissingField,
    /// Lower-case substrings to look for
    keywords: Vec<String>,
}

/// The full keyword table.
///
/// # Example
///
/// ```
/// use nurseai_extraction::{KeywordTable, MissingField};
///
/// let table = KeywordTable::bundled().unwrap();
/// assert_eq!(table.section().heading(), "missing data");
/// assert_eq!(table.fields_matching("sp02 not recorded"), vec![MissingField::Spo2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct KeywordTable {
    /// Section markers
    section: SectionMarkers,
    /// Per-field keywords
    fields: Vec<FieldKeywords>,
}

impl KeywordTable {
    /// The table shipped with the crate.
    pub fn bundled() -> NurseAiResult<Self> {
        Self::from_toml_str(BUNDLED_KEYWORDS)
    }

    /// Parse a table from TOML.
    ///
    /// Keywords and markers are lower-cased; blank entries are rejected.
    pub fn from_toml_str(toml: &str) -> NurseAiResult<Self> {
        let table: Self = toml::from_str(toml).map_err(|e| {
            NurseAiError::from(ConfigError::new(format!(
                "Failed to parse keyword table: {}",
                e
            )))
        })?;
        table.normalized()
    }

    /// Load a table from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> NurseAiResult<Self> {
        debug!("Loading keyword table from file");
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            NurseAiError::from(ConfigError::new(format!(
                "Failed to read keyword table {}: {}",
                path.as_ref().display(),
                e
            )))
        })?;
        Self::from_toml_str(&text)
    }

    /// Fields whose keywords occur in `token` (already lower-case).
    pub fn fields_matching(&self, token: &str) -> Vec<MissingField> {
        self.fields
            .iter()
            .filter(|field| {
                field
                    .keywords
                    .iter()
                    .any(|keyword| token.contains(keyword.as_str()))
            })
            .map(|field| field.key)
            .collect()
    }

    fn normalized(mut self) -> NurseAiResult<Self> {
        self.section.heading = self.section.heading.trim().to_lowercase();
        if self.section.heading.is_empty() {
            return Err(ConfigError::new("Keyword table section heading is empty").into());
        }

        self.section.closing = self
            .section
            .closing
            .iter()
            .map(|marker| marker.trim().to_lowercase())
            .filter(|marker| !marker.is_empty())
            .collect();

        for field in &mut self.fields {
            field.keywords = field
                .keywords
                .iter()
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect();
            if field.keywords.is_empty() {
                return Err(ConfigError::new(format!(
                    "Keyword table entry for {} has no keywords",
                    field.key
                ))
                .into());
            }
        }

        Ok(self)
    }
}
