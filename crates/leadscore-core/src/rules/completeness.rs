//! Data Completeness
//!
//! 10 points when name, role, company, industry, location and bio are all
//! present and non-empty, otherwise 0. No partial credit.

use crate::profile::{LeadProfile, OfferProfile};
use crate::types::{CriterionKind, CriterionScore};

use super::Criterion;

pub const COMPLETE_POINTS: u8 = 10;

/// The data completeness criterion.
pub struct CompletenessCriterion;

impl CompletenessCriterion {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CompletenessCriterion {
    fn default() -> Self {
        Self::new()
    }
}

impl Criterion for CompletenessCriterion {
    fn kind(&self) -> CriterionKind {
        CriterionKind::DataCompleteness
    }

    fn max_points(&self) -> u8 {
        COMPLETE_POINTS
    }

    fn evaluate(&self, lead: &LeadProfile, _offer: &OfferProfile) -> CriterionScore {
        let missing = lead.missing_fields();

        if missing.is_empty() {
            return self.score(COMPLETE_POINTS, "All profile fields present".to_string());
        }

        let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
        self.score(0, format!("Missing: {}", names.join(", ")))
    }
}
