//! Value types shared by the rule evaluator, the combiner and the runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Points awarded by the reasoning step when the intent is unknown or the
/// call failed. Equal to the `Low` mapping.
pub const FALLBACK_POINTS: u8 = 10;

/// Justification attached to every fallback verdict.
pub const FALLBACK_JUSTIFICATION: &str = "AI analysis failed due to an API error.";

/// Coarse buying-intent classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentLabel {
    High,
    Medium,
    Low,
}

impl IntentLabel {
    /// Points the reasoning step contributes for this label.
    pub fn reasoning_points(self) -> u8 {
        match self {
            IntentLabel::High => 50,
            IntentLabel::Medium => 30,
            IntentLabel::Low => 10,
        }
    }

    /// Exact, case-sensitive lookup of a model token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "High" => Some(IntentLabel::High),
            "Medium" => Some(IntentLabel::Medium),
            "Low" => Some(IntentLabel::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntentLabel::High => "High",
            IntentLabel::Medium => "Medium",
            IntentLabel::Low => "Low",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result for one (lead, offer) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// Rule score plus reasoning points, 0-100
    pub score: u8,

    /// Label derived from `score`
    pub intent: IntentLabel,

    /// Justification from the reasoning step
    pub reasoning: String,
}

/// Where a reasoning verdict came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerdictSource {
    /// Parsed from a model response
    Model,

    /// Substituted after the reasoning call failed
    Fallback { cause: String },
}

/// Output of the reasoning step for one lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningVerdict {
    /// Label reported by the model, `None` when the token was unrecognized
    /// or the call fell back
    pub label: Option<IntentLabel>,

    /// Points contributed to the final score (10, 30 or 50)
    pub points: u8,

    pub justification: String,

    pub source: VerdictSource,
}

impl ReasoningVerdict {
    /// Verdict parsed from a model response. Unrecognized labels score as Low.
    pub fn from_model(label: Option<IntentLabel>, justification: impl Into<String>) -> Self {
        Self {
            label,
            points: label.map_or(FALLBACK_POINTS, IntentLabel::reasoning_points),
            justification: justification.into(),
            source: VerdictSource::Model,
        }
    }

    /// Conservative verdict used whenever the reasoning call fails.
    pub fn fallback(cause: impl Into<String>) -> Self {
        Self {
            label: None,
            points: FALLBACK_POINTS,
            justification: FALLBACK_JUSTIFICATION.to_string(),
            source: VerdictSource::Fallback {
                cause: cause.into(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, VerdictSource::Fallback { .. })
    }
}

/// The three rule criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    RoleRelevance,
    IndustryMatch,
    DataCompleteness,
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CriterionKind::RoleRelevance => "role relevance",
            CriterionKind::IndustryMatch => "industry match",
            CriterionKind::DataCompleteness => "data completeness",
        };
        f.write_str(name)
    }
}

/// Points one criterion awarded, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: CriterionKind,
    pub points: u8,
    pub max_points: u8,
    pub rationale: String,
}

/// Per-criterion rule scores for one lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBreakdown {
    pub role: CriterionScore,
    pub industry: CriterionScore,
    pub completeness: CriterionScore,
}

impl RuleBreakdown {
    /// Sum of the three criteria, 0-50.
    pub fn total(&self) -> u8 {
        self.role.points + self.industry.points + self.completeness.points
    }

    pub fn criteria(&self) -> [&CriterionScore; 3] {
        [&self.role, &self.industry, &self.completeness]
    }
}
