//! Scoring engine: rules plus reasoning for one lead or a whole batch.
//!
//! - `combine` scores one (lead, offer) pair
//! - `score_batch` fans leads out over spawned tasks, at most
//!   `batch.max_concurrency` at a time, and reports one entry per lead in
//!   input order. A slow lead holds only its own slot.
//! - `score_batch_until` also watches a shutdown signal; leads not yet
//!   started when it fires are reported as cancelled, in-flight leads finish
//!
//! A failure for one lead (rejected record, invalid profile, panicked task) is
//! reported in that lead's entry and never touches the others.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use leadscore_core::{
    LeadBatch, LeadProfile, OfferProfile, ReasoningVerdict, RuleBreakdown, RuleEvaluator,
    ScoreCombiner, ScoreOutcome,
};

use crate::config::{ConfigError, RuntimeConfig};
use crate::providers::{LlmProvider, ProviderError, ProviderRegistry};
use crate::reasoning::ReasoningClient;
use crate::usage::LlmUsage;

/// Errors from the scoring engine.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Lead batch is empty")]
    EmptyBatch,

    #[error("Invalid offer: {0}")]
    InvalidOffer(String),

    #[error("Invalid lead at index {index}: {reason}")]
    InvalidLead { index: usize, reason: String },

    #[error("Cancelled before scoring started")]
    Cancelled,

    #[error("Scoring task failed: {0}")]
    TaskFailed(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Everything known about one scored lead.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredLead {
    pub outcome: ScoreOutcome,
    pub rules: RuleBreakdown,
    pub verdict: ReasoningVerdict,
    pub usage: LlmUsage,
}

/// One batch entry.
#[derive(Debug)]
pub struct LeadScore {
    /// Position in the input batch
    pub index: usize,
    pub lead: LeadProfile,
    pub result: Result<ScoredLead, ScoringError>,
}

impl LeadScore {
    pub fn is_fallback(&self) -> bool {
        matches!(&self.result, Ok(scored) if scored.verdict.is_fallback())
    }
}

/// Result of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// One entry per input lead, in input order
    pub results: Vec<LeadScore>,
    pub usage: LlmUsage,
    pub completed_at: DateTime<Utc>,
}

impl BatchReport {
    /// Leads that produced an outcome (fallbacks included).
    pub fn scored(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_ok()).count()
    }

    pub fn fallbacks(&self) -> usize {
        self.results.iter().filter(|r| r.is_fallback()).count()
    }

    pub fn cancelled(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.result, Err(ScoringError::Cancelled)))
            .count()
    }

    /// Leads that failed for a reason other than cancellation.
    pub fn failed(&self) -> usize {
        self.results.len() - self.scored() - self.cancelled()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (&LeadProfile, &ScoreOutcome)> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().ok().map(|s| (&r.lead, &s.outcome)))
    }
}

/// Scores leads against an offer.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    reasoning: ReasoningClient,
    max_concurrency: usize,
}

impl ScoringEngine {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &RuntimeConfig) -> Self {
        Self {
            reasoning: ReasoningClient::from_config(provider, config),
            max_concurrency: config.batch.max_concurrency.max(1),
        }
    }

    /// Validate the config and build the provider it names.
    pub fn from_config(config: &RuntimeConfig, registry: &ProviderRegistry) -> Result<Self, ScoringError> {
        config.validate()?;
        let provider = registry.create(&config.provider)?;
        Ok(Self::new(provider, config))
    }

    /// Score one lead against the offer.
    pub async fn combine(&self, lead: &LeadProfile, offer: &OfferProfile) -> ScoreOutcome {
        score_lead(&self.reasoning, lead, offer).await.outcome
    }

    /// Score every lead. Rejects an invalid offer or an empty batch before any
    /// call is made. Records rejected at load time are reported as
    /// `InvalidLead` in their position.
    pub async fn score_batch(
        &self,
        leads: impl Into<LeadBatch>,
        offer: &OfferProfile,
    ) -> Result<BatchReport, ScoringError> {
        // Never fires; the sender lives until the batch is done
        let (_never, shutdown) = watch::channel(false);
        self.score_batch_until(leads, offer, shutdown).await
    }

    /// Like [`score_batch`](Self::score_batch), but stops starting new leads
    /// once `shutdown` reads `true`.
    pub async fn score_batch_until(
        &self,
        leads: impl Into<LeadBatch>,
        offer: &OfferProfile,
        shutdown: watch::Receiver<bool>,
    ) -> Result<BatchReport, ScoringError> {
        offer
            .validate()
            .map_err(|e| ScoringError::InvalidOffer(e.to_string()))?;
        let batch: LeadBatch = leads.into();
        if batch.is_empty() {
            return Err(ScoringError::EmptyBatch);
        }

        let total = batch.len();
        let offer = Arc::new(offer.clone());
        tracing::info!(
            leads = total,
            offer = %offer.name,
            provider = self.reasoning.provider_name(),
            concurrency = self.max_concurrency,
            "Scoring batch"
        );

        let mut results: Vec<LeadScore> = stream::iter(batch.records.into_iter().enumerate())
            .map(|(index, record)| {
                // Read when the slot opens, so only unstarted leads are cancelled
                let cancelled = *shutdown.borrow();
                let reasoning = self.reasoning.clone();
                let offer = Arc::clone(&offer);
                async move {
                    let lead = match record {
                        Ok(lead) => lead,
                        Err(rejected) => {
                            return LeadScore {
                                index,
                                lead: LeadProfile::new(rejected.name),
                                result: Err(ScoringError::InvalidLead {
                                    index,
                                    reason: rejected.error.to_string(),
                                }),
                            }
                        }
                    };
                    let result = if cancelled {
                        Err(ScoringError::Cancelled)
                    } else {
                        run_lead_task(reasoning, index, lead.clone(), offer).await
                    };
                    LeadScore {
                        index,
                        lead,
                        result,
                    }
                }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;
        results.sort_by_key(|r| r.index);

        let report = BatchReport {
            usage: results
                .iter()
                .filter_map(|r| r.result.as_ref().ok().map(|s| s.usage))
                .sum(),
            results,
            completed_at: Utc::now(),
        };

        tracing::info!(
            scored = report.scored(),
            fallback = report.fallbacks(),
            failed = report.failed(),
            cancelled = report.cancelled(),
            llm_calls = report.usage.llm_calls,
            "Batch complete"
        );

        Ok(report)
    }
}

/// Score a lead on its own task so a panic stays with that lead.
async fn run_lead_task(
    reasoning: ReasoningClient,
    index: usize,
    lead: LeadProfile,
    offer: Arc<OfferProfile>,
) -> Result<ScoredLead, ScoringError> {
    if let Err(e) = lead.validate() {
        tracing::warn!(index, error = %e, "Skipping invalid lead");
        return Err(ScoringError::InvalidLead {
            index,
            reason: e.to_string(),
        });
    }

    let handle = tokio::spawn(async move { score_lead(&reasoning, &lead, &offer).await });

    handle.await.map_err(|e| {
        tracing::error!(index, error = %e, "Scoring task failed");
        ScoringError::TaskFailed(e.to_string())
    })
}

async fn score_lead(reasoning: &ReasoningClient, lead: &LeadProfile, offer: &OfferProfile) -> ScoredLead {
    let rules = RuleEvaluator::new().evaluate(lead, offer);
    let inference = reasoning.infer_intent(lead, offer).await;
    let outcome = ScoreCombiner::new().combine(&rules, &inference.verdict);

    tracing::debug!(
        lead = %lead.name,
        rules = rules.total(),
        reasoning = inference.verdict.points,
        score = outcome.score,
        intent = %outcome.intent,
        "Lead scored"
    );

    ScoredLead {
        outcome,
        rules,
        verdict: inference.verdict,
        usage: inference.usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatMessage, CompletionConfig, CompletionResponse, TokenUsage};
    use async_trait::async_trait;
    use leadscore_core::IntentLabel;

    /// Answers every prompt with the same text.
    struct FixedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: self.0.to_string(),
                usage: TokenUsage {
                    prompt_tokens: 50,
                    completion_tokens: 10,
                },
                model: "fixed".to_string(),
                stop_reason: None,
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn engine(reply: &'static str) -> ScoringEngine {
        ScoringEngine::new(Arc::new(FixedProvider(reply)), &RuntimeConfig::default())
    }

    fn offer() -> OfferProfile {
        OfferProfile::new("AI Outreach Automation")
            .with_value_prop("24/7 outreach")
            .with_use_case("B2B SaaS mid-market")
            .with_use_case("sales teams")
    }

    #[tokio::test]
    async fn test_combine_rule_thirty_plus_high_is_high() {
        let lead = LeadProfile::new("Sam Lee")
            .with_role("Senior Software Engineer")
            .with_company("DataCorp")
            .with_industry("General SaaS")
            .with_location("Austin")
            .with_bio("Builds data pipelines.");

        let outcome = engine("Intent: High\nReasoning: Actively evaluating tools.")
            .combine(&lead, &offer())
            .await;
        assert_eq!(outcome.score, 80);
        assert_eq!(outcome.intent, IntentLabel::High);
        assert_eq!(outcome.reasoning, "Actively evaluating tools.");
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let result = engine("Intent: Low\nReasoning: r")
            .score_batch(Vec::<LeadProfile>::new(), &offer())
            .await;
        assert!(matches!(result, Err(ScoringError::EmptyBatch)));
    }

    #[tokio::test]
    async fn test_invalid_offer_rejected() {
        let result = engine("Intent: Low\nReasoning: r")
            .score_batch(vec![LeadProfile::new("A")], &OfferProfile::new("  "))
            .await;
        assert!(matches!(result, Err(ScoringError::InvalidOffer(_))));
    }

    #[tokio::test]
    async fn test_invalid_lead_reported_in_place() {
        let leads = vec![LeadProfile::new("A"), LeadProfile::new(""), LeadProfile::new("C")];
        let report = engine("Intent: Medium\nReasoning: r")
            .score_batch(leads, &offer())
            .await
            .unwrap();

        assert_eq!(report.results.len(), 3);
        assert!(report.results[0].result.is_ok());
        assert!(matches!(
            report.results[1].result,
            Err(ScoringError::InvalidLead { index: 1, .. })
        ));
        assert!(report.results[2].result.is_ok());
        assert_eq!(report.scored(), 2);
        assert_eq!(report.failed(), 1);
        // Invalid lead made no call
        assert_eq!(report.usage.llm_calls, 2);
    }

    #[tokio::test]
    async fn test_loaded_batch_with_bad_records_scores_the_rest() {
        let batch = LeadProfile::batch_from_json(
            r#"[
                {"name": "Ava Patel", "role": "Head of Growth", "industry": "B2B SaaS"},
                {"name": ""},
                {"name": "Sam Lee", "role": 42},
                {"name": "Pat Doe", "role": "Student", "email": "pat@uni.edu"}
            ]"#,
        )
        .unwrap();

        let report = engine("Intent: Low\nReasoning: r")
            .score_batch(batch, &offer())
            .await
            .unwrap();

        assert_eq!(report.results.len(), 4);
        assert_eq!(report.scored(), 2);
        assert_eq!(report.failed(), 2);
        assert!(report.results[0].result.is_ok());
        assert!(matches!(
            report.results[1].result,
            Err(ScoringError::InvalidLead { index: 1, .. })
        ));
        match &report.results[2].result {
            Err(ScoringError::InvalidLead { index: 2, reason }) => {
                assert!(reason.contains("leads[2]"));
            }
            other => panic!("Expected InvalidLead, got {:?}", other),
        }
        assert_eq!(report.results[2].lead.name, "Sam Lee");
        assert!(report.results[3].result.is_ok());
        assert_eq!(report.usage.llm_calls, 2);
    }

    #[tokio::test]
    async fn test_shutdown_before_start_cancels_everything() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let report = engine("Intent: High\nReasoning: r")
            .score_batch_until(vec![LeadProfile::new("A"), LeadProfile::new("B")], &offer(), rx)
            .await
            .unwrap();

        assert_eq!(report.cancelled(), 2);
        assert_eq!(report.scored(), 0);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.usage, LlmUsage::default());
    }
}
