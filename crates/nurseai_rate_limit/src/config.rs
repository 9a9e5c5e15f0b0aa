//! Layered configuration loading.
//!
//! Sources, lowest to highest precedence:
//! - Bundled defaults (include_str! from nurseai.toml)
//! - `~/.config/nurseai/nurseai.toml`
//! - `./nurseai.toml`
//! - `NURSEAI__SECTION__KEY` environment variables
//!
//! `GEMINI_MODEL`, when set, pins the model after all sources are merged.

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use nurseai_core::{ClientRetryConfig, GateConfig, ModelsConfig, ServerConfig};
use nurseai_error::{ConfigError, NurseAiError, NurseAiResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// Bundled default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../nurseai.toml");

/// Top-level NurseAI configuration.
///
/// # Example
///
/// ```no_run
/// use nurseai_rate_limit::NurseAiConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = NurseAiConfig::load()?;
/// println!("Minimum spacing: {:?}", config.gateway().min_interval());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default, Getters)]
pub struct NurseAiConfig {
    /// Call pacing and retry policy
    #[serde(default)]
    gateway: GateConfig,
    /// External service endpoint and model selection
    #[serde(default)]
    models: ModelsConfig,
    /// Inbound HTTP API
    #[serde(default)]
    server: ServerConfig,
    /// Client retry workflow
    #[serde(default)]
    client: ClientRetryConfig,
}

impl NurseAiConfig {
    /// Load configuration with precedence: env > current dir > home dir > bundled defaults.
    #[instrument]
    pub fn load() -> NurseAiResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/nurseai/nurseai.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("nurseai").required(false))
            .add_source(
                Environment::with_prefix("NURSEAI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = Self::deserialize_from(builder)?;
        Ok(config.with_model_env())
    }

    /// Load configuration from a specific file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> NurseAiResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        Self::deserialize_from(builder)
    }

    /// Parse a TOML document layered over the bundled defaults.
    pub fn from_toml_str(toml: &str) -> NurseAiResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(toml, FileFormat::Toml));
        Self::deserialize_from(builder)
    }

    /// Bundled defaults only.
    pub fn bundled() -> NurseAiResult<Self> {
        Self::from_toml_str("")
    }

    fn deserialize_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> NurseAiResult<Self> {
        builder
            .build()
            .map_err(|e| {
                NurseAiError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                NurseAiError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    fn with_model_env(mut self) -> Self {
        if let Ok(model) = std::env::var("GEMINI_MODEL")
            && !model.trim().is_empty()
        {
            debug!(model = %model, "Pinning model from GEMINI_MODEL");
            self.models = self.models.with_model(Some(model.trim().to_string()));
        }
        self
    }
}
