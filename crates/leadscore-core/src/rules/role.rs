//! Role Relevance
//!
//! **Question**: Does this person sign off on purchases, or shape them?
//!
//! | Points | Condition |
//! |--------|-----------|
//! | 20 | role contains a decision-maker keyword |
//! | 10 | otherwise, role contains an influencer keyword |
//! | 0 | neither |
//!
//! The tiers are exclusive: a role matching both sets scores 20.

use crate::profile::{LeadField, LeadProfile, OfferProfile};
use crate::types::{CriterionKind, CriterionScore};

use super::keywords::{decision_maker_keyword, influencer_keyword};
use super::Criterion;

pub const DECISION_MAKER_POINTS: u8 = 20;
pub const INFLUENCER_POINTS: u8 = 10;

/// The role relevance criterion.
pub struct RoleCriterion;

impl RoleCriterion {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RoleCriterion {
    fn default() -> Self {
        Self::new()
    }
}

impl Criterion for RoleCriterion {
    fn kind(&self) -> CriterionKind {
        CriterionKind::RoleRelevance
    }

    fn max_points(&self) -> u8 {
        DECISION_MAKER_POINTS
    }

    fn evaluate(&self, lead: &LeadProfile, _offer: &OfferProfile) -> CriterionScore {
        let role = lead.field(LeadField::Role).to_lowercase();

        let (points, rationale) = if let Some(keyword) = decision_maker_keyword(&role) {
            (
                DECISION_MAKER_POINTS,
                format!("Decision-maker keyword '{}' in role", keyword),
            )
        } else if let Some(keyword) = influencer_keyword(&role) {
            (
                INFLUENCER_POINTS,
                format!("Influencer keyword '{}' in role", keyword),
            )
        } else if role.is_empty() {
            (0, "No role provided".to_string())
        } else {
            (0, "Role carries no decision-maker or influencer keyword".to_string())
        };

        self.score(points, rationale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer() -> OfferProfile {
        OfferProfile::new("Test Offer")
    }

    fn points_for(role: &str) -> u8 {
        RoleCriterion::new()
            .evaluate(&LeadProfile::new("Lead").with_role(role), &offer())
            .points
    }

    #[test]
    fn test_decision_maker_scores_twenty() {
        assert_eq!(points_for("Head of Growth"), 20);
        assert_eq!(points_for("Marketing Manager"), 20);
        assert_eq!(points_for("CEO"), 20);
    }

    #[test]
    fn test_influencer_scores_ten() {
        assert_eq!(points_for("Senior Software Engineer"), 10);
        assert_eq!(points_for("Solutions Architect"), 10);
    }

    #[test]
    fn test_both_sets_score_twenty_not_thirty() {
        assert_eq!(points_for("Engineering Manager"), 20);
        assert_eq!(points_for("Director of Developer Relations"), 20);
    }

    #[test]
    fn test_irrelevant_and_missing_roles_score_zero() {
        assert_eq!(points_for("Student"), 0);
        assert_eq!(points_for(""), 0);

        let finding = RoleCriterion::new().evaluate(&LeadProfile::new("Lead"), &offer());
        assert_eq!(finding.points, 0);
        assert_eq!(finding.rationale, "No role provided");
    }

    #[test]
    fn test_rationale_names_keyword() {
        let finding = RoleCriterion::new()
            .evaluate(&LeadProfile::new("Lead").with_role("VP Sales"), &offer());
        assert_eq!(finding.criterion, CriterionKind::RoleRelevance);
        assert_eq!(finding.max_points, 20);
        assert!(finding.rationale.contains("'vp'"));
    }
}
