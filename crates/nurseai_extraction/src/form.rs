//! The follow-up form shown when a suggestion reports missing data.

use crate::{MissingField, MissingFieldSet};
use nurseai_error::{NurseAiResult, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const FOLLOWUP_HEADER: &str = "Updated patient demographics and vitals:";

/// Values the clinician supplies for the fields a suggestion reported missing.
///
/// # Example
///
/// ```
/// use nurseai_extraction::{MissingDataForm, MissingField, MissingFieldSet};
///
/// let mut form = MissingDataForm::new(MissingFieldSet::from([MissingField::Spo2, MissingField::Age]));
/// form.set(MissingField::Age, "54").unwrap();
/// assert!(!form.is_complete());
///
/// form.set(MissingField::Spo2, " 97% ").unwrap();
/// assert_eq!(
///     form.followup_message().unwrap(),
///     "Updated patient demographics and vitals:\nAge: 54\nSpO2: 97%"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDataForm {
    required: MissingFieldSet,
    values: BTreeMap<MissingField, String>,
}

impl MissingDataForm {
    /// An empty form for `required` fields.
    pub fn new(required: MissingFieldSet) -> Self {
        Self {
            required,
            values: BTreeMap::new(),
        }
    }

    /// Fields the form asks for.
    pub fn required(&self) -> &MissingFieldSet {
        &self.required
    }

    /// Record a value for a required field.
    ///
    /// # Errors
    ///
    /// Rejects fields the suggestion did not report missing.
    pub fn set(&mut self, field: MissingField, value: impl Into<String>) -> NurseAiResult<()> {
        if !self.required.contains(&field) {
            return Err(ValidationError::new(format!(
                "{} was not reported missing",
                field.label()
            ))
            .into());
        }
        self.values.insert(field, value.into());
        Ok(())
    }

    /// The value entered for `field`, if any.
    pub fn value(&self, field: MissingField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Required fields that are still blank.
    pub fn outstanding(&self) -> MissingFieldSet {
        self.required
            .iter()
            .filter(|field| {
                self.values
                    .get(field)
                    .is_none_or(|value| value.trim().is_empty())
            })
            .copied()
            .collect()
    }

    /// True when every required field has a non-blank value.
    pub fn is_complete(&self) -> bool {
        self.outstanding().is_empty()
    }

    /// Follow-up message carrying the entered values, one `Label: value` per line.
    ///
    /// # Errors
    ///
    /// Fails while any required field is blank.
    pub fn followup_message(&self) -> NurseAiResult<String> {
        let outstanding = self.outstanding();
        if !outstanding.is_empty() {
            let labels: Vec<&str> = outstanding.iter().map(MissingField::label).collect();
            return Err(ValidationError::new(format!(
                "Missing values for: {}",
                labels.join(", ")
            ))
            .into());
        }

        let lines = self
            .required
            .iter()
            .filter_map(|field| {
                self.values
                    .get(field)
                    .map(|value| format!("{}: {}", field.label(), value.trim()))
            });

        Ok(std::iter::once(FOLLOWUP_HEADER.to_string())
            .chain(lines)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
