//! Combiner: merges the rule score and the reasoning verdict into the final
//! score and intent label.
//!
//! The thresholds are fixed:
//! 1. score >= 80 → High
//! 2. else score >= 50 → Medium
//! 3. else → Low
//!
//! The label is derived from the combined score only, never copied from the
//! model's own label.

use crate::rules::MAX_RULE_SCORE;
use crate::types::{IntentLabel, ReasoningVerdict, RuleBreakdown, ScoreOutcome};

pub const HIGH_THRESHOLD: u8 = 80;
pub const MEDIUM_THRESHOLD: u8 = 50;

/// Highest combined score: 50 rule points plus 50 reasoning points.
pub const MAX_SCORE: u8 = 100;

/// The ScoreCombiner turns both halves of a score into a [`ScoreOutcome`].
pub struct ScoreCombiner;

impl ScoreCombiner {
    pub fn new() -> Self {
        Self
    }

    /// Combine a rule breakdown and a reasoning verdict.
    pub fn combine(&self, rules: &RuleBreakdown, verdict: &ReasoningVerdict) -> ScoreOutcome {
        self.combine_points(rules.total(), verdict.points, &verdict.justification)
    }

    /// Combine raw point values.
    pub fn combine_points(&self, rule_score: u8, reasoning_points: u8, reasoning: &str) -> ScoreOutcome {
        debug_assert!(rule_score <= MAX_RULE_SCORE);

        let score = rule_score.saturating_add(reasoning_points).min(MAX_SCORE);
        ScoreOutcome {
            score,
            intent: Self::classify(score),
            reasoning: reasoning.to_string(),
        }
    }

    /// Map a combined score onto an intent label.
    pub fn classify(score: u8) -> IntentLabel {
        if score >= HIGH_THRESHOLD {
            IntentLabel::High
        } else if score >= MEDIUM_THRESHOLD {
            IntentLabel::Medium
        } else {
            IntentLabel::Low
        }
    }
}

impl Default for ScoreCombiner {
    fn default() -> Self {
        Self::new()
    }
}
