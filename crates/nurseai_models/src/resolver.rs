//! Discovery and caching of the model identifier to use.

use crate::GenerativeService;
use nurseai_core::{ModelInfo, ModelsConfig};
use nurseai_rate_limit::RateGate;
use nurseai_error::{ExternalFailure, ExternalFailureKind, ExternalResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

const MODEL_PREFIX: &str = "models/";

/// Prefix a bare model name with `models/`.
///
/// # Examples
///
/// ```
/// use nurseai_models::normalize_model_name;
///
/// assert_eq!(normalize_model_name("gemini-1.5-flash"), "models/gemini-1.5-flash");
/// assert_eq!(normalize_model_name("models/gemini-1.5-pro"), "models/gemini-1.5-pro");
/// ```
pub fn normalize_model_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with(MODEL_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", MODEL_PREFIX, name)
    }
}

/// Pick a model from a listing.
///
/// Only models advertising `required_method` are eligible. Preferences are
/// tried in order and the first eligible model whose name contains the
/// preference wins; with no preferred match the first eligible model is
/// chosen.
///
/// # Errors
///
/// [`ExternalFailureKind::NoCompatibleModel`] when nothing is eligible.
pub fn select_model(
    models: &[ModelInfo],
    preferences: &[String],
    required_method: &str,
) -> ExternalResult<String> {
    let eligible: Vec<&ModelInfo> = models
        .iter()
        .filter(|model| model.supports(required_method))
        .collect();

    let preferred = preferences.iter().find_map(|preference| {
        eligible
            .iter()
            .find(|model| model.name.contains(preference.as_str()))
    });

    preferred
        .or_else(|| eligible.first())
        .map(|model| normalize_model_name(&model.name))
        .ok_or_else(|| {
            ExternalFailure::new(ExternalFailureKind::NoCompatibleModel(
                required_method.to_string(),
            ))
        })
}

/// Resolves, and caches for the process lifetime, the model to call.
///
/// A pinned model (configuration or `GEMINI_MODEL`) is used without
/// discovery until it fails with "model not found". The cache is
/// read-mostly; concurrent refreshes after a failure are harmless.
///
/// Listing calls pass through the shared [`RateGate`] when one is attached.
#[derive(Debug)]
pub struct ModelResolver {
    service: Arc<dyn GenerativeService>,
    gate: Option<RateGate>,
    preferences: Vec<String>,
    required_method: String,
    pinned: RwLock<Option<String>>,
    cached: RwLock<Option<String>>,
}

impl ModelResolver {
    /// Create a resolver with an explicit preference list.
    pub fn new(
        service: Arc<dyn GenerativeService>,
        preferences: Vec<String>,
        required_method: impl Into<String>,
    ) -> Self {
        Self {
            service,
            gate: None,
            preferences,
            required_method: required_method.into(),
            pinned: RwLock::new(None),
            cached: RwLock::new(None),
        }
    }

    /// Create a resolver from the `[models]` configuration section.
    pub fn from_config(service: Arc<dyn GenerativeService>, config: &ModelsConfig) -> Self {
        let resolver = Self::new(
            service,
            config.preferences().clone(),
            config.required_method().clone(),
        );
        match config.model() {
            Some(model) => resolver.with_pinned_model(model),
            None => resolver,
        }
    }

    /// Pace listing calls through `gate`.
    pub fn with_gate(self, gate: RateGate) -> Self {
        Self {
            gate: Some(gate),
            ..self
        }
    }

    /// Use `model` without discovery until it is reported unavailable.
    pub fn with_pinned_model(self, model: impl AsRef<str>) -> Self {
        Self {
            pinned: RwLock::new(Some(normalize_model_name(model.as_ref()))),
            ..self
        }
    }

    /// The model to use, discovering it on first call.
    ///
    /// # Errors
    ///
    /// Propagates listing failures and
    /// [`ExternalFailureKind::NoCompatibleModel`].
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> ExternalResult<String> {
        if let Some(model) = self.cached.read().await.clone() {
            return Ok(model);
        }

        let pinned = self.pinned.read().await.clone();
        if let Some(model) = pinned {
            debug!(model = %model, "Using pinned model");
            *self.cached.write().await = Some(model.clone());
            return Ok(model);
        }

        self.discover().await
    }

    /// The cached model, if one has been resolved.
    pub async fn current(&self) -> Option<String> {
        self.cached.read().await.clone()
    }

    /// Forget `model` so the next resolution rediscovers.
    ///
    /// A pin on `model` is dropped as well.
    #[instrument(skip(self))]
    pub async fn invalidate(&self, model: &str) {
        let model = normalize_model_name(model);

        {
            let mut cached = self.cached.write().await;
            if cached.as_deref() == Some(model.as_str()) {
                *cached = None;
            }
        }

        let mut pinned = self.pinned.write().await;
        if pinned.as_deref() == Some(model.as_str()) {
            warn!(model = %model, "Pinned model is unavailable, falling back to discovery");
            *pinned = None;
        }
    }

    /// Invalidate `failed` and discover a replacement.
    ///
    /// The replacement may equal `failed` if the listing still advertises it.
    #[instrument(skip(self))]
    pub async fn fallback(&self, failed: &str) -> ExternalResult<String> {
        self.invalidate(failed).await;
        self.discover().await
    }

    async fn discover(&self) -> ExternalResult<String> {
        if let Some(gate) = &self.gate {
            gate.acquire().await;
        }
        let models = self.service.list_models().await?;
        let model = select_model(&models, &self.preferences, &self.required_method)?;

        info!(
            model = %model,
            listed = models.len(),
            provider = self.service.provider_name(),
            "Resolved model"
        );
        *self.cached.write().await = Some(model.clone());
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Vec<String> {
        vec!["gemini-1.5-flash".to_string(), "gemini-1.5-pro".to_string()]
    }

    #[test]
    fn preference_order_wins_over_listing_order() {
        let models = vec![
            ModelInfo::new("models/gemini-1.5-pro-002", ["generateContent"]),
            ModelInfo::new("models/gemini-1.5-flash-latest", ["generateContent"]),
        ];
        let model = select_model(&models, &prefs(), "generateContent").unwrap();
        assert_eq!(model, "models/gemini-1.5-flash-latest");
    }

    #[test]
    fn ineligible_preferred_model_is_skipped() {
        let models = vec![
            ModelInfo::new("models/gemini-1.5-flash", ["embedContent"]),
            ModelInfo::new("models/gemini-1.5-pro", ["generateContent"]),
        ];
        let model = select_model(&models, &prefs(), "generateContent").unwrap();
        assert_eq!(model, "models/gemini-1.5-pro");
    }

    #[test]
    fn first_eligible_when_nothing_preferred() {
        let models = vec![
            ModelInfo::new("models/text-embedding-004", ["embedContent"]),
            ModelInfo::new("models/gemini-exp", ["generateContent", "countTokens"]),
            ModelInfo::new("models/gemini-other", ["generateContent"]),
        ];
        let model = select_model(&models, &prefs(), "generateContent").unwrap();
        assert_eq!(model, "models/gemini-exp");
    }

    #[test]
    fn no_eligible_model_is_error() {
        let models = vec![ModelInfo::new("models/text-embedding-004", ["embedContent"])];
        let err = select_model(&models, &prefs(), "generateContent").unwrap_err();
        assert!(matches!(
            err.kind(),
            ExternalFailureKind::NoCompatibleModel(method) if method == "generateContent"
        ));

        let err = select_model(&[], &prefs(), "generateContent").unwrap_err();
        assert!(matches!(err.kind(), ExternalFailureKind::NoCompatibleModel(_)));
    }
}
