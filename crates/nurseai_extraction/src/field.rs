//! The fixed vocabulary of fields a suggestion can report missing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A demographic or vital sign the clinician may need to supply.
///
/// Ordering follows the vocabulary: demographics first, then vitals.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MissingField {
    /// Patient age
    Age,
    /// Patient gender
    Gender,
    /// Patient occupation
    Occupation,
    /// Oxygen saturation
    Spo2,
    /// Blood pressure
    Bp,
    /// Heart rate
    Hr,
    /// Respiratory rate
    Rr,
    /// Body weight
    Weight,
    /// Body height
    Height,
    /// Body mass index
    Bmi,
}

impl MissingField {
    /// Stable key, e.g. `spo2`.
    pub fn key(&self) -> &'static str {
        match self {
            MissingField::Age => "age",
            MissingField::Gender => "gender",
            MissingField::Occupation => "occupation",
            MissingField::Spo2 => "spo2",
            MissingField::Bp => "bp",
            MissingField::Hr => "hr",
            MissingField::Rr => "rr",
            MissingField::Weight => "weight",
            MissingField::Height => "height",
            MissingField::Bmi => "bmi",
        }
    }

    /// Human-readable label used in forms and follow-up messages.
    pub fn label(&self) -> &'static str {
        match self {
            MissingField::Age => "Age",
            MissingField::Gender => "Gender",
            MissingField::Occupation => "Occupation",
            MissingField::Spo2 => "SpO2",
            MissingField::Bp => "BP",
            MissingField::Hr => "HR",
            MissingField::Rr => "RR",
            MissingField::Weight => "Weight",
            MissingField::Height => "Height",
            MissingField::Bmi => "BMI",
        }
    }
}

/// Deduplicated, vocabulary-ordered set of missing fields.
///
/// Always derived from the current suggestion text, never stored.
pub type MissingFieldSet = BTreeSet<MissingField>;
