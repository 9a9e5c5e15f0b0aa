//! Conversation roles understood by the external service.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
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
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Content supplied by the clinician or the backend on their behalf
    User,
    /// Content previously generated by the service
    Model,
}
