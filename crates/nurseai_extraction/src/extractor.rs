//! Locating the missing-data section and mapping it onto fields.

use crate::{KeywordTable, MissingFieldSet};
use nurseai_error::{ConfigError, NurseAiError, NurseAiResult};
use regex::Regex;
use tracing::{debug, trace};

/// Finds the fields a generated suggestion reports as missing.
///
/// The section starts at a numbered heading such as `8. Missing Data` and
/// runs until the next numbered section with a higher number or a closing
/// marker such as `Tone:`, whichever comes first. Only that span is
/// tokenised (on newlines, commas and slashes) and matched against the
/// keyword table, so the surrounding narrative cannot produce matches.
#[derive(Debug, Clone)]
pub struct SuggestionExtractor {
    table: KeywordTable,
    heading: Regex,
    next_section: Regex,
    closing: Option<Regex>,
}

impl SuggestionExtractor {
    /// Build an extractor over a keyword table.
    pub fn new(table: KeywordTable) -> NurseAiResult<Self> {
        let heading_words: Vec<String> = table
            .section()
            .heading()
            .split_whitespace()
            .map(regex::escape)
            .collect();
        let heading = compile(&format!(r"(?i)(\d+)\s*\.\s*{}", heading_words.join(r"\s+")))?;
        let next_section = compile(r"(?m)^[\s*#_>-]*(\d+)\s*\.\s")?;

        let closing = if table.section().closing().is_empty() {
            None
        } else {
            let alternatives: Vec<String> = table
                .section()
                .closing()
                .iter()
                .map(|marker| regex::escape(marker))
                .collect();
            Some(compile(&format!("(?i){}", alternatives.join("|")))?)
        };

        Ok(Self {
            table,
            heading,
            next_section,
            closing,
        })
    }

    /// Extractor over the bundled keyword table.
    pub fn bundled() -> NurseAiResult<Self> {
        Self::new(KeywordTable::bundled()?)
    }

    /// The keyword table in use.
    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// Fields reported missing in `content`; empty when there is no section.
    pub fn extract_missing(&self, content: &str) -> MissingFieldSet {
        let Some(section) = self.section(content) else {
            trace!("No missing-data section");
            return MissingFieldSet::new();
        };

        let missing: MissingFieldSet = section
            .split(['\n', ',', '/'])
            .map(|token| token.replace('\r', "").trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .flat_map(|token| self.table.fields_matching(&token))
            .collect();

        debug!(count = missing.len(), fields = ?missing, "Extracted missing fields");
        missing
    }

    /// The text between the heading and the end of the section.
    fn section<'a>(&self, content: &'a str) -> Option<&'a str> {
        let captures = self.heading.captures(content)?;
        let heading = captures.get(0)?;
        let number: u32 = captures.get(1)?.as_str().parse().ok()?;

        let rest = &content[heading.end()..];
        let mut end = rest.len();

        if let Some(closing) = &self.closing
            && let Some(found) = closing.find(rest)
        {
            end = end.min(found.start());
        }

        let later_section = self.next_section.captures_iter(rest).find(|captures| {
            captures
                .get(1)
                .and_then(|n| n.as_str().parse::<u32>().ok())
                .is_some_and(|n| n > number)
        });
        if let Some(start) = later_section.and_then(|captures| captures.get(0)) {
            end = end.min(start.start());
        }

        Some(&rest[..end])
    }
}

fn compile(pattern: &str) -> NurseAiResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        NurseAiError::from(ConfigError::new(format!(
            "Invalid missing-data pattern {}: {}",
            pattern, e
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MissingField;

    fn extractor() -> SuggestionExtractor {
        SuggestionExtractor::bundled().unwrap()
    }

    #[test]
    fn narrative_outside_section_is_ignored() {
        let content = "1. Case Synthesis\nAge 54, BP 150/90\n8. Missing Data\nWeight\nTone: brief, mention age";
        let missing = extractor().extract_missing(content);
        assert_eq!(missing, MissingFieldSet::from([MissingField::Weight]));
    }

    #[test]
    fn numbered_list_inside_section_is_kept() {
        let content = "8. Missing Data\n1. SpO2\n2. RR\n3. BMI\n\nTone: concise";
        let missing = extractor().extract_missing(content);
        assert_eq!(
            missing,
            MissingFieldSet::from([MissingField::Spo2, MissingField::Rr, MissingField::Bmi])
        );
    }

    #[test]
    fn later_section_ends_the_span() {
        let content = "8. Missing Data\nHeight\n9. Notes\nPatient reports weight loss";
        let missing = extractor().extract_missing(content);
        assert_eq!(missing, MissingFieldSet::from([MissingField::Height]));
    }

    #[test]
    fn markdown_heading_is_found() {
        let content = "**8. Missing Data**\n- Blood pressure\n- Heart rate\n\n**Tone:** concise";
        let missing = extractor().extract_missing(content);
        assert_eq!(
            missing,
            MissingFieldSet::from([MissingField::Bp, MissingField::Hr])
        );
    }
}
