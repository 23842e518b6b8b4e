//! Provider factory pattern for selecting an LLM backend by name.
//!
//! `provider.kind` in the runtime config is looked up in a
//! [`ProviderRegistry`]; the matching [`ProviderFactory`] builds the provider
//! from the rest of the `provider` section.
//!
//! ## Usage
//!
//! ```ignore
//! let registry = ProviderRegistry::with_defaults();
//! let provider = registry.create(&config.provider)?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{LlmProvider, ProviderError};
use crate::config::ProviderConfig;

/// Builds one kind of provider from the `provider` config section.
pub trait ProviderFactory: Send + Sync {
    /// Registry key, matched against `provider.kind`.
    fn provider_type(&self) -> &'static str;

    fn create(&self, config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>, ProviderError>;

    /// Check credentials and settings without building a provider.
    fn validate_config(&self, config: &ProviderConfig) -> Result<(), ProviderError>;

    fn description(&self) -> &'static str {
        "LLM Provider"
    }
}

/// Registry of available provider factories.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider factory, replacing any with the same key.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories
            .insert(factory.provider_type().to_string(), factory);
    }

    /// Create the provider named by `config.kind`.
    pub fn create(&self, config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let provider = self.factory_for(&config.kind)?.create(config)?;
        tracing::debug!(provider = provider.name(), model = %config.model, "Provider created");
        Ok(provider)
    }

    /// Validate the `provider` section against its factory.
    pub fn validate(&self, config: &ProviderConfig) -> Result<(), ProviderError> {
        self.factory_for(&config.kind)?.validate_config(config)
    }

    /// Human-readable description of the factory registered under `provider_type`.
    pub fn description(&self, provider_type: &str) -> Option<&'static str> {
        self.factories.get(provider_type).map(|f| f.description())
    }

    pub fn available_types(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    pub fn has_provider(&self, provider_type: &str) -> bool {
        self.factories.contains_key(provider_type)
    }

    fn factory_for(&self, provider_type: &str) -> Result<&Arc<dyn ProviderFactory>, ProviderError> {
        self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Unknown provider type: '{}'. Available: {:?}",
                provider_type,
                self.available_types()
            ))
        })
    }

    /// Registry with every built-in provider.
    #[cfg(feature = "gemini")]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::GeminiProviderFactory));
        registry
    }

    /// Registry with every built-in provider.
    #[cfg(not(feature = "gemini"))]
    pub fn with_defaults() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatMessage, CompletionConfig, CompletionResponse, TokenUsage};
    use async_trait::async_trait;

    struct EchoProvider {
        model: String,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: "Intent: Low\nReasoning: echo".to_string(),
                usage: TokenUsage::default(),
                model: self.model.clone(),
                stop_reason: None,
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct EchoProviderFactory;

    impl ProviderFactory for EchoProviderFactory {
        fn provider_type(&self) -> &'static str {
            "echo"
        }

        fn create(&self, config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>, ProviderError> {
            self.validate_config(config)?;
            Ok(Arc::new(EchoProvider {
                model: config.model.clone(),
            }))
        }

        fn validate_config(&self, config: &ProviderConfig) -> Result<(), ProviderError> {
            if config.model == "forbidden" {
                return Err(ProviderError::NotConfigured("model not allowed".to_string()));
            }
            Ok(())
        }

        fn description(&self) -> &'static str {
            "Echoes a fixed verdict"
        }
    }

    fn echo_config(model: &str) -> ProviderConfig {
        ProviderConfig {
            kind: "echo".to_string(),
            model: model.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_registry_register_and_create() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoProviderFactory));

        assert!(registry.has_provider("echo"));
        assert!(!registry.has_provider("unknown"));

        let provider = registry.create(&echo_config("m1")).unwrap();
        assert_eq!(provider.name(), "echo");
    }

    #[test]
    fn test_registry_unknown_provider() {
        let registry = ProviderRegistry::new();
        match registry.create(&echo_config("m1")) {
            Err(ProviderError::NotConfigured(msg)) => {
                assert!(msg.contains("Unknown provider type: 'echo'"));
            }
            _ => panic!("Expected NotConfigured error"),
        }
    }

    #[test]
    fn test_registry_validate() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoProviderFactory));

        assert!(registry.validate(&echo_config("m1")).is_ok());
        assert!(registry.validate(&echo_config("forbidden")).is_err());
    }

    #[tokio::test]
    async fn test_created_provider_passes_health_check() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(EchoProviderFactory));

        assert_eq!(registry.description("echo"), Some("Echoes a fixed verdict"));
        assert_eq!(registry.description("unknown"), None);

        let provider = registry.create(&echo_config("m1")).unwrap();
        assert!(provider.health_check().await);
    }

    #[cfg(feature = "gemini")]
    #[test]
    fn test_defaults_include_gemini() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.available_types(), vec!["gemini"]);
        assert_eq!(
            registry.description("gemini"),
            Some("Google Gemini generateContent provider")
        );
    }
}
