//! Reasoning client: asks the model for a lead's buying intent.
//!
//! `infer_intent` never fails. Each attempt is bounded by the configured
//! timeout, transient errors are retried, and anything still failing after
//! that (or a response the parser rejects) becomes the fallback verdict.

mod parser;

pub use parser::{parse_intent_response, ParseError};

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use leadscore_core::{LeadProfile, OfferProfile, ReasoningVerdict};

use crate::config::RuntimeConfig;
use crate::prompts::intent_messages;
use crate::providers::{CompletionConfig, CompletionResponse, LlmProvider, ProviderError};
use crate::resilience::{fallback_verdict, FallbackCause, RetryPolicy};
use crate::usage::LlmUsage;

/// A verdict and what it cost to obtain.
#[derive(Debug, Clone)]
pub struct Inference {
    pub verdict: ReasoningVerdict,
    pub usage: LlmUsage,
}

/// Calls the provider for one lead at a time. Cheap to clone; clones share
/// the provider.
#[derive(Clone)]
pub struct ReasoningClient {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
    retry: RetryPolicy,
}

impl ReasoningClient {
    pub fn new(provider: Arc<dyn LlmProvider>, completion: CompletionConfig, retry: RetryPolicy) -> Self {
        Self {
            provider,
            completion,
            retry,
        }
    }

    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &RuntimeConfig) -> Self {
        Self::new(provider, config.completion_config(), config.retry_policy())
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Intent points and justification for a lead.
    pub async fn infer_intent(&self, lead: &LeadProfile, offer: &OfferProfile) -> Inference {
        let mut usage = LlmUsage::default();

        let verdict = match self.request(lead, offer, &mut usage).await {
            Ok(response) => match parse_intent_response(&response.content) {
                Ok(verdict) => {
                    tracing::debug!(
                        lead = %lead.name,
                        points = verdict.points,
                        "Intent inferred"
                    );
                    verdict
                }
                Err(e) => fallback_verdict(&lead.name, FallbackCause::from(e)),
            },
            Err(e) => fallback_verdict(&lead.name, FallbackCause::from(e)),
        };

        Inference { verdict, usage }
    }

    /// Send the prompt with per-attempt timeout and retry.
    async fn request(
        &self,
        lead: &LeadProfile,
        offer: &OfferProfile,
        usage: &mut LlmUsage,
    ) -> Result<CompletionResponse, ProviderError> {
        let messages = intent_messages(lead, offer);
        let provider = self.provider.as_ref();
        let completion = &self.completion;
        let messages = &messages;
        let attempts = AtomicU32::new(0);
        let attempts_ref = &attempts;

        tracing::debug!(
            lead = %lead.name,
            provider = provider.name(),
            model = %completion.model,
            "Dispatching intent prompt"
        );

        let result = self
            .retry
            .run(&lead.name, || async move {
                attempts_ref.fetch_add(1, Ordering::Relaxed);
                match tokio::time::timeout(
                    completion.timeout,
                    provider.complete(messages.clone(), completion),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout(completion.timeout)),
                }
            })
            .await;

        usage.record_calls(attempts.load(Ordering::Relaxed));
        if let Ok(response) = &result {
            usage.add(&response.usage);
        }
        result
    }
}

impl std::fmt::Debug for ReasoningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningClient")
            .field("provider", &self.provider.name())
            .field("completion", &self.completion)
            .field("retry", &self.retry)
            .finish()
    }
}
