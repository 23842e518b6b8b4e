//! # leadscore-core
//!
//! Deterministic half of lead intent scoring.
//!
//! This crate answers, without any network call:
//! - How well does this lead's role, industry and profile fit the offer? (0-50)
//! - Given the reasoning points, what is the final score and label? (0-100)
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same lead and offer always produce the same rule score
//! 2. **No LLM calls**: The reasoning verdict is supplied by the caller
//! 3. **Traceable**: Every criterion reports why it awarded its points
//!
//! ## Example
//!
//! ```rust,ignore
//! use leadscore_core::{IntentLabel, LeadProfile, OfferProfile, ReasoningVerdict, RuleEvaluator, ScoreCombiner};
//!
//! let offer = OfferProfile::from_file("offer.yaml")?;
//! let lead = LeadProfile::new("Ava Patel").with_role("Head of Growth");
//!
//! let rules = RuleEvaluator::new().evaluate(&lead, &offer);
//! let verdict = ReasoningVerdict::from_model(Some(IntentLabel::High), "Clear buying signals.");
//! let outcome = ScoreCombiner::new().combine(&rules, &verdict);
//! println!("{} -> {} ({})", lead.name, outcome.score, outcome.intent);
//! ```

pub mod combiner;
pub mod profile;
pub mod rules;
pub mod types;

pub use combiner::{ScoreCombiner, HIGH_THRESHOLD, MAX_SCORE, MEDIUM_THRESHOLD};
pub use profile::{
    LeadBatch, LeadField, LeadProfile, OfferProfile, ProfileError, RejectedLead,
};
pub use rules::{
    score_rules, CompletenessCriterion, Criterion, IndustryCriterion, RoleCriterion,
    RuleEvaluator, MAX_RULE_SCORE,
};
pub use types::{
    CriterionKind, CriterionScore, IntentLabel, ReasoningVerdict, RuleBreakdown, ScoreOutcome,
    VerdictSource, FALLBACK_JUSTIFICATION, FALLBACK_POINTS,
};

/// Score a lead from its rule breakdown and an already-obtained verdict.
pub fn score_with_verdict(
    lead: &LeadProfile,
    offer: &OfferProfile,
    verdict: &ReasoningVerdict,
) -> ScoreOutcome {
    let rules = RuleEvaluator::new().evaluate(lead, offer);
    ScoreCombiner::new().combine(&rules, verdict)
}
