//! Rule-based scoring: three independent criteria worth 0-50 points together.
//!
//! Every criterion sees the same (lead, offer) pair and never calls out to
//! anything. The same inputs always yield the same breakdown.

mod completeness;
mod industry;
pub mod keywords;
mod role;

pub use completeness::CompletenessCriterion;
pub use industry::IndustryCriterion;
pub use role::RoleCriterion;

use crate::profile::{LeadProfile, OfferProfile};
use crate::types::{CriterionKind, CriterionScore, RuleBreakdown};

/// Highest total the rule layer can award.
pub const MAX_RULE_SCORE: u8 = 50;

/// A single deterministic scoring criterion.
pub trait Criterion: Send + Sync {
    fn kind(&self) -> CriterionKind;

    /// Points awarded when the criterion is fully satisfied.
    fn max_points(&self) -> u8;

    fn evaluate(&self, lead: &LeadProfile, offer: &OfferProfile) -> CriterionScore;

    /// Build a score for this criterion.
    fn score(&self, points: u8, rationale: String) -> CriterionScore {
        debug_assert!(points <= self.max_points());
        CriterionScore {
            criterion: self.kind(),
            points,
            max_points: self.max_points(),
            rationale,
        }
    }
}

/// Runs the three criteria against one lead.
#[derive(Default)]
pub struct RuleEvaluator {
    role: RoleCriterion,
    industry: IndustryCriterion,
    completeness: CompletenessCriterion,
}

impl RuleEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a lead against an offer, criterion by criterion.
    pub fn evaluate(&self, lead: &LeadProfile, offer: &OfferProfile) -> RuleBreakdown {
        let breakdown = RuleBreakdown {
            role: self.role.evaluate(lead, offer),
            industry: self.industry.evaluate(lead, offer),
            completeness: self.completeness.evaluate(lead, offer),
        };

        tracing::trace!(
            lead = %lead.name,
            role = breakdown.role.points,
            industry = breakdown.industry.points,
            completeness = breakdown.completeness.points,
            "Rules evaluated"
        );

        breakdown
    }
}

/// Rule score for a lead, 0-50.
pub fn score_rules(lead: &LeadProfile, offer: &OfferProfile) -> u8 {
    RuleEvaluator::new().evaluate(lead, offer).total()
}
