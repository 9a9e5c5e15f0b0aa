//! Configuration sections shared across crates.
//!
//! Each section deserialises from one table of `nurseai.toml`. Every field
//! has a default so partial overrides are valid.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// `[gateway]`: pacing of calls to the external service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(default)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum spacing between consecutive call starts (milliseconds)
    min_interval_ms: u64,
    /// Optional hard cap on calls per minute, on top of the spacing
    requests_per_minute: Option<u32>,
    /// Retry policy for transient failures
    retry: RetryPolicyConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 1000,
            requests_per_minute: None,
            retry: RetryPolicyConfig::default(),
        }
    }
}

impl GateConfig {
    /// Minimum spacing as a duration.
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

/// `[gateway.retry]`: exponential backoff for transient failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(default)]
#[serde(default)]
pub struct RetryPolicyConfig {
    /// Retries after the first attempt
    max_retries: u32,
    /// First backoff delay (milliseconds)
    base_backoff_ms: u64,
    /// Ceiling for any single backoff delay (milliseconds)
    max_backoff_ms: u64,
    /// Randomise each delay
    jitter: bool,
    /// Report exhausted overload (503) failures as rate limited
    overload_is_rate_limited: bool,
    /// Wait reported when the service gave no hint (seconds)
    rate_limited_floor_secs: u64,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff_ms: 1000,
            max_backoff_ms: 8000,
            jitter: false,
            overload_is_rate_limited: true,
            rate_limited_floor_secs: 60,
        }
    }
}

impl RetryPolicyConfig {
    /// First backoff delay.
    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }

    /// Backoff ceiling.
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Wait reported when the service gave no hint.
    pub fn rate_limited_floor(&self) -> Duration {
        Duration::from_secs(self.rate_limited_floor_secs)
    }
}

/// `[models]`: external service endpoint and model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct ModelsConfig {
    /// REST base URL of the external service
    api_base_url: String,
    /// Pinned model; skips discovery while it keeps working
    model: Option<String>,
    /// Preferred model names, in order
    preferences: Vec<String>,
    /// Generation method a model must advertise to be eligible
    required_method: String,
    /// Per-call timeout (seconds)
    request_timeout_secs: u64,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com/v1".to_string(),
            model: None,
            preferences: vec![
                "gemini-1.5-flash".to_string(),
                "gemini-1.5-pro".to_string(),
                "gemini-2.0-flash".to_string(),
                "gemini-2.0-pro".to_string(),
            ],
            required_method: "generateContent".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl ModelsConfig {
    /// Per-call timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Replace the pinned model.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// `[server]`: inbound HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    bind: String,
    /// Directory for uploaded media
    media_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            media_dir: PathBuf::from("./nurseai-media"),
        }
    }
}

/// `[client]`: client-side retry workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct ClientRetryConfig {
    /// How long a retry ticket stays valid (seconds)
    window_secs: u64,
    /// Total generation attempts allowed per ticket
    max_attempts: u32,
    /// Wait used when the backend gave no positive hint (seconds)
    default_retry_after_secs: u64,
    /// Where the ticket is persisted; platform data dir when unset
    ticket_path: Option<PathBuf>,
    /// Base URL of the gateway's inbound API
    backend_url: String,
}

impl Default for ClientRetryConfig {
    fn default() -> Self {
        Self {
            window_secs: 30 * 60,
            max_attempts: 3,
            default_retry_after_secs: 60,
            ticket_path: None,
            backend_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}

impl ClientRetryConfig {
    /// Ticket validity window.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Default wait between attempts.
    pub fn default_retry_after(&self) -> Duration {
        Duration::from_secs(self.default_retry_after_secs)
    }

    /// Point the client at a different gateway.
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let gate: GateConfig = from_json(r#"{"min_interval_ms": 250}"#);
        assert_eq!(gate.min_interval(), Duration::from_millis(250));
        assert_eq!(gate.retry().max_retries(), &3);
        assert!(gate.requests_per_minute().is_none());
    }

    #[test]
    fn client_defaults_match_workflow() {
        let client = ClientRetryConfig::default();
        assert_eq!(client.window(), Duration::from_secs(1800));
        assert_eq!(client.max_attempts(), &3);
        assert_eq!(client.default_retry_after(), Duration::from_secs(60));
    }

    #[test]
    fn builder_overrides_single_field() {
        let retry = RetryPolicyConfigBuilder::default()
            .max_retries(0u32)
            .build()
            .unwrap();
        assert_eq!(retry.max_retries(), &0);
        assert_eq!(retry.rate_limited_floor(), Duration::from_secs(60));
    }

    fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> T {
        serde_json::from_str(json).unwrap()
    }
}
