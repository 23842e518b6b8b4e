//! Rendering of batch results and rule breakdowns.

use serde::Serialize;

use leadscore_core::{IntentLabel, LeadField, LeadProfile, RuleBreakdown};
use leadscore_runtime::{BatchReport, LeadScore};

/// One scored lead as printed by `score --format json`.
#[derive(Debug, Serialize, PartialEq)]
pub struct ScoreRow<'a> {
    pub name: &'a str,
    pub role: &'a str,
    pub company: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a LeadScore> for ScoreRow<'a> {
    fn from(entry: &'a LeadScore) -> Self {
        let lead = &entry.lead;
        let base = ScoreRow {
            name: &lead.name,
            role: lead.field(LeadField::Role),
            company: lead.field(LeadField::Company),
            intent: None,
            score: None,
            reasoning: None,
            error: None,
        };

        match &entry.result {
            Ok(scored) => ScoreRow {
                intent: Some(scored.outcome.intent),
                score: Some(scored.outcome.score),
                reasoning: Some(&scored.outcome.reasoning),
                ..base
            },
            Err(e) => ScoreRow {
                error: Some(e.to_string()),
                ..base
            },
        }
    }
}

pub fn score_rows(report: &BatchReport) -> Vec<ScoreRow<'_>> {
    report.results.iter().map(ScoreRow::from).collect()
}

pub fn score_table(report: &BatchReport) -> String {
    let mut out = format!(
        "{:<24} {:<28} {:>5}  {:<6}  {}\n",
        "NAME", "ROLE", "SCORE", "INTENT", "REASONING"
    );
    for row in score_rows(report) {
        let (score, intent, detail) = match (&row.error, row.score, row.intent) {
            (Some(error), _, _) => ("-".to_string(), "-".to_string(), error.clone()),
            (None, Some(score), Some(intent)) => (
                score.to_string(),
                intent.to_string(),
                row.reasoning.unwrap_or_default().to_string(),
            ),
            _ => ("-".to_string(), "-".to_string(), String::new()),
        };
        out.push_str(&format!(
            "{:<24} {:<28} {:>5}  {:<6}  {}\n",
            truncate(row.name, 24),
            truncate(row.role, 28),
            score,
            intent,
            detail
        ));
    }
    out
}

/// One lead's rule breakdown as printed by `rules --format json`.
#[derive(Debug, Serialize)]
pub struct RulesRow<'a> {
    pub name: &'a str,
    pub rule_score: u8,
    pub breakdown: &'a RuleBreakdown,
}

pub fn rules_table(rows: &[(&LeadProfile, RuleBreakdown)]) -> String {
    let mut out = format!(
        "{:<24} {:>4} {:>8} {:>12} {:>5}\n",
        "NAME", "ROLE", "INDUSTRY", "COMPLETENESS", "TOTAL"
    );
    for (lead, breakdown) in rows {
        out.push_str(&format!(
            "{:<24} {:>4} {:>8} {:>12} {:>5}\n",
            truncate(&lead.name, 24),
            breakdown.role.points,
            breakdown.industry.points,
            breakdown.completeness.points,
            breakdown.total()
        ));
        for criterion in breakdown.criteria() {
            out.push_str(&format!("    {}: {}\n", criterion.criterion, criterion.rationale));
        }
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
