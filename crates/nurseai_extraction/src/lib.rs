//! Missing-data detection for generated clinical suggestions.
//!
//! Generated suggestions end with a numbered "Missing Data" section listing
//! the demographics and vitals the model could not determine. This crate
//! finds that section, maps its contents onto a fixed vocabulary of
//! [`MissingField`]s, and builds the follow-up message once the clinician
//! has filled the gaps in.
//!
//! The keyword table is data: the bundled `keywords.toml` can be replaced
//! with [`KeywordTable::from_file`] without touching the matching logic.
//!
//! # Example
//!
//! ```
//! use nurseai_extraction::{MissingField, SuggestionExtractor};
//!
//! let extractor = SuggestionExtractor::bundled().unwrap();
//! let content = "7. Guide\n...\n8. Missing Data\nSpO2 / BP / HR\n\nTone: concise";
//! let missing = extractor.extract_missing(content);
//!
//! assert_eq!(
//!     missing.into_iter().collect::<Vec<_>>(),
//!     vec![MissingField::Spo2, MissingField::Bp, MissingField::Hr]
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extractor;
mod field;
mod form;
mod keywords;

pub use extractor::SuggestionExtractor;
pub use field::{MissingField, MissingFieldSet};
pub use form::MissingDataForm;
pub use keywords::{FieldKeywords, KeywordTable, SectionMarkers};
