//! Industry Match
//!
//! **Question**: Is this lead in a market the offer targets?
//!
//! | Points | Condition |
//! |--------|-----------|
//! | 20 | industry is a substring of an ideal use case (exact match) |
//! | 10 | otherwise, industry contains an adjacent keyword |
//! | 0 | neither, or no industry given |
//!
//! Comparison is case-insensitive. A blank industry never earns the exact
//! match bonus, even though the empty string is a substring of every use case.

use crate::profile::{LeadField, LeadProfile, OfferProfile};
use crate::types::{CriterionKind, CriterionScore};

use super::keywords::adjacent_industry_keyword;
use super::Criterion;

pub const EXACT_MATCH_POINTS: u8 = 20;
pub const ADJACENT_MATCH_POINTS: u8 = 10;

/// The industry match criterion.
pub struct IndustryCriterion;

impl IndustryCriterion {
    pub fn new() -> Self {
        Self
    }

    /// First ideal use case containing the lower-cased industry.
    fn matching_use_case<'a>(industry: &str, offer: &'a OfferProfile) -> Option<&'a str> {
        offer
            .ideal_use_cases
            .iter()
            .find(|use_case| use_case.to_lowercase().contains(industry))
            .map(String::as_str)
    }
}

impl Default for IndustryCriterion {
    fn default() -> Self {
        Self::new()
    }
}

impl Criterion for IndustryCriterion {
    fn kind(&self) -> CriterionKind {
        CriterionKind::IndustryMatch
    }

    fn max_points(&self) -> u8 {
        EXACT_MATCH_POINTS
    }

    fn evaluate(&self, lead: &LeadProfile, offer: &OfferProfile) -> CriterionScore {
        let industry = lead.field(LeadField::Industry).to_lowercase();

        if industry.trim().is_empty() {
            return self.score(0, "No industry provided".to_string());
        }

        if let Some(use_case) = Self::matching_use_case(&industry, offer) {
            return self.score(
                EXACT_MATCH_POINTS,
                format!("Industry falls within ideal use case '{}'", use_case),
            );
        }

        if let Some(keyword) = adjacent_industry_keyword(&industry) {
            return self.score(
                ADJACENT_MATCH_POINTS,
                format!("Adjacent industry keyword '{}'", keyword),
            );
        }

        self.score(0, "Industry outside the offer's target market".to_string())
    }
}
