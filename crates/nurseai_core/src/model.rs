//! Model listing entries.

use serde::{Deserialize, Serialize};

/// A model advertised by the external service's model listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Full model name, e.g. `models/gemini-1.5-flash`
    pub name: String,
    /// Generation methods the model supports, e.g. `generateContent`
    #[serde(default, alias = "supportedMethods")]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Create a listing entry.
    pub fn new<S: Into<String>>(name: impl Into<String>, methods: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            supported_generation_methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// True if the model advertises `method`.
    pub fn supports(&self, method: &str) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|supported| supported == method)
    }
}
