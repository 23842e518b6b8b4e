//! # leadscore-runtime
//!
//! LLM-assisted half of lead intent scoring.
//!
//! `leadscore-core` scores the rules; this crate asks a model for the
//! buying-intent verdict, combines the two, and runs whole batches.
//!
//! ## Guarantees
//!
//! - A reasoning failure of any kind (network, timeout, service error,
//!   malformed reply) becomes a 10-point fallback verdict, never an error
//! - Batch results come back in input order, one entry per lead
//! - No state is shared between leads apart from the provider itself
//!
//! ## Example
//!
//! ```rust,ignore
//! use leadscore_runtime::{ProviderRegistry, RuntimeConfig, ScoringEngine};
//!
//! let config = RuntimeConfig::from_file("leadscore.yaml")?;
//! let engine = ScoringEngine::from_config(&config, &ProviderRegistry::with_defaults())?;
//!
//! let report = engine.score_batch(leads, &offer).await?;
//! for (lead, outcome) in report.outcomes() {
//!     println!("{}: {} ({})", lead.name, outcome.score, outcome.intent);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod prompts;
pub mod providers;
pub mod reasoning;
pub mod resilience;
pub mod usage;

pub use config::{BatchConfig, ConfigError, ProviderConfig, ReasoningConfig, RuntimeConfig};
pub use engine::{BatchReport, LeadScore, ScoredLead, ScoringEngine, ScoringError};
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, CredentialSource,
    LlmProvider, ProviderError, ProviderFactory, ProviderRegistry, TokenUsage,
};
pub use reasoning::{parse_intent_response, Inference, ParseError, ReasoningClient};
pub use resilience::RetryPolicy;
pub use usage::LlmUsage;

#[cfg(feature = "gemini")]
pub use providers::{GeminiProvider, GeminiProviderFactory};
