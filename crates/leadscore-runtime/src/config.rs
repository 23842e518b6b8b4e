//! Runtime configuration.
//!
//! Every section and field has a default, so an empty document (or no file at
//! all) yields a working Gemini setup that reads `GOOGLE_API_KEY`.
//!
//! ```yaml
//! provider:
//!   kind: gemini
//!   model: gemini-1.5-flash
//! reasoning:
//!   timeout: 15s
//!   max_retries: 1
//!   retry_min_delay: 250ms
//! batch:
//!   max_concurrency: 4
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::providers::CompletionConfig;
use crate::resilience::RetryPolicy;

/// Errors from loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML config: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON config: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported config extension: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub provider: ProviderConfig,
    pub reasoning: ReasoningConfig,
    pub batch: BatchConfig,
}

/// Which backend answers the intent prompt.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Registry key of the provider factory
    pub kind: String,

    pub model: String,

    /// Takes precedence over the provider's environment variable. Never
    /// written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Override the provider's API endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: "gemini".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Limits on each reasoning call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReasoningConfig {
    /// Per-attempt timeout
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// Retries after the first attempt, transient errors only
    pub max_retries: usize,

    /// First backoff delay; later delays grow exponentially
    #[serde(with = "humantime_duration")]
    pub retry_min_delay: Duration,

    pub max_tokens: u32,

    pub temperature: f32,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_retries: 1,
            retry_min_delay: Duration::from_millis(250),
            max_tokens: 256,
            temperature: 0.0,
        }
    }
}

/// Batch fan-out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Leads scored at the same time
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml(&fs::read_to_string(path)?)?,
            "json" => Self::from_json(&fs::read_to_string(path)?)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        tracing::debug!(path = %path.display(), provider = %config.provider.kind, "Runtime config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.kind.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "provider.kind",
                reason: "must not be empty".to_string(),
            });
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "provider.model",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(url) = &self.provider.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    field: "provider.base_url",
                    reason: "must start with http:// or https://".to_string(),
                });
            }
        }
        if self.reasoning.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "reasoning.timeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.reasoning.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reasoning.max_tokens",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.reasoning.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "reasoning.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.reasoning.temperature),
            });
        }
        if self.batch.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch.max_concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Request settings for each reasoning call.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.provider.model.clone(),
            max_tokens: self.reasoning.max_tokens,
            temperature: self.reasoning.temperature,
            timeout: self.reasoning.timeout,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.reasoning.max_retries,
            min_delay: self.reasoning.retry_min_delay,
        }
    }
}

/// `Duration` as a humantime string ("15s", "250ms", "1m 30s").
mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RuntimeConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.provider.kind, "gemini");
        assert_eq!(config.provider.model, "gemini-1.5-flash");
        assert_eq!(config.reasoning.timeout, Duration::from_secs(15));
        assert_eq!(config.reasoning.max_retries, 1);
        assert_eq!(config.batch.max_concurrency, 4);
    }

    #[test]
    fn test_humantime_durations() {
        let config = RuntimeConfig::from_yaml(
            r#"
reasoning:
  timeout: 1m 30s
  retry_min_delay: 100ms
"#,
        )
        .unwrap();
        assert_eq!(config.reasoning.timeout, Duration::from_secs(90));
        assert_eq!(config.reasoning.retry_min_delay, Duration::from_millis(100));
        // Unspecified fields in a present section keep their defaults
        assert_eq!(config.reasoning.max_tokens, 256);
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let result = RuntimeConfig::from_yaml("reasoning:\n  timeout: soon\n");
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = RuntimeConfig::from_json(r#"{"batch": {"max_concurrency": 0}}"#);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "batch.max_concurrency", .. })
        ));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let result = RuntimeConfig::from_yaml("provider:\n  base_url: localhost:8080\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "provider.base_url", .. })
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(RuntimeConfig::from_yaml("provider:\n  modle: typo\n").is_err());
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let config = RuntimeConfig::from_yaml("provider:\n  api_key: AIza-secret\n").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_api_key_never_serialized() {
        let config = RuntimeConfig::from_yaml("provider:\n  api_key: AIza-secret\n").unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("AIza-secret"));

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("AIza-secret"));
        assert!(!yaml.contains("api_key"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("AIza-secret"));

        assert_eq!(RuntimeConfig::from_yaml(&yaml).unwrap().provider.api_key, None);
    }

    #[test]
    fn test_completion_config_and_retry_policy() {
        let config = RuntimeConfig::default();
        let completion = config.completion_config();
        assert_eq!(completion.model, "gemini-1.5-flash");
        assert_eq!(completion.timeout, Duration::from_secs(15));

        let retry = config.retry_policy();
        assert_eq!(retry.max_retries, 1);
        assert_eq!(retry.min_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&RuntimeConfig::default()).unwrap();
        assert!(yaml.contains("15s"));
        assert_eq!(RuntimeConfig::from_yaml(&yaml).unwrap(), RuntimeConfig::default());
    }
}
