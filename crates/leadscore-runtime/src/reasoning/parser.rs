//! Parser for the two-line intent response.
//!
//! ```text
//! Intent: High
//! Reasoning: Heads growth at a mid-market SaaS company.
//! ```
//!
//! The whole response is trimmed and split into lines. Line 0 without the
//! `Intent:` prefix is the label token, looked up case-sensitively; an
//! unknown token scores as Low. Line 1 without the `Reasoning:` prefix is
//! the justification, kept even when empty. Lines after the second are
//! ignored. Fewer than two lines is an error, which the caller turns into a
//! fallback.

use thiserror::Error;

use leadscore_core::{IntentLabel, ReasoningVerdict};

const INTENT_PREFIX: &str = "Intent:";
const REASONING_PREFIX: &str = "Reasoning:";

/// A response the parser cannot use.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty response")]
    Empty,

    #[error("response has no reasoning line")]
    MissingReasoningLine,
}

fn strip_marker<'a>(line: &'a str, prefix: &str) -> &'a str {
    let line = line.trim();
    line.strip_prefix(prefix).unwrap_or(line).trim()
}

/// Parse a model response into a verdict.
pub fn parse_intent_response(text: &str) -> Result<ReasoningVerdict, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut lines = text.lines();
    let intent_line = lines.next().ok_or(ParseError::Empty)?;
    let reasoning_line = lines.next().ok_or(ParseError::MissingReasoningLine)?;

    let token = strip_marker(intent_line, INTENT_PREFIX);
    let label = IntentLabel::from_token(token);
    if label.is_none() {
        tracing::debug!(token = %token, "Unrecognized intent label, scoring as Low");
    }

    Ok(ReasoningVerdict::from_model(
        label,
        strip_marker(reasoning_line, REASONING_PREFIX),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(text: &str) -> ReasoningVerdict {
        parse_intent_response(text).unwrap()
    }

    #[test]
    fn test_well_formed_responses() {
        let verdict = parse("Intent: High\nReasoning: Heads growth at a SaaS company.");
        assert_eq!(verdict.label, Some(IntentLabel::High));
        assert_eq!(verdict.points, 50);
        assert_eq!(verdict.justification, "Heads growth at a SaaS company.");
        assert!(!verdict.is_fallback());

        assert_eq!(parse("Intent: Medium\nReasoning: Some fit.").points, 30);
        assert_eq!(parse("Intent: Low\nReasoning: No fit.").points, 10);
    }

    #[test]
    fn test_surrounding_whitespace_and_crlf() {
        let verdict = parse("\n\n  Intent:   Medium  \r\nReasoning:   Possible budget.  \r\n\n");
        assert_eq!(verdict.label, Some(IntentLabel::Medium));
        assert_eq!(verdict.justification, "Possible budget.");
    }

    #[test]
    fn test_missing_prefixes_still_parse() {
        let verdict = parse("High\nClear need for outreach automation.");
        assert_eq!(verdict.points, 50);
        assert_eq!(verdict.justification, "Clear need for outreach automation.");
    }

    #[test]
    fn test_label_lookup_is_case_sensitive() {
        let verdict = parse("Intent: high\nReasoning: Lowercase label.");
        assert_eq!(verdict.label, None);
        assert_eq!(verdict.points, 10);
        assert!(!verdict.is_fallback());
        assert_eq!(verdict.justification, "Lowercase label.");
    }

    #[test]
    fn test_unknown_or_decorated_labels_score_low() {
        assert_eq!(parse("Intent: Very High\nReasoning: r").points, 10);
        assert_eq!(parse("Intent: [High]\nReasoning: r").points, 10);
        assert_eq!(parse("**Intent:** High\nReasoning: r").points, 10);
        assert_eq!(parse("Intent:\nReasoning: r").points, 10);
    }

    #[test]
    fn test_single_line_is_malformed() {
        assert_eq!(
            parse_intent_response("Intent: High"),
            Err(ParseError::MissingReasoningLine)
        );
        assert_eq!(
            parse_intent_response("Intent: High Reasoning: all on one line"),
            Err(ParseError::MissingReasoningLine)
        );
    }

    #[test]
    fn test_empty_and_blank_responses() {
        assert_eq!(parse_intent_response(""), Err(ParseError::Empty));
        assert_eq!(parse_intent_response("  \n\t\n "), Err(ParseError::Empty));
    }

    #[test]
    fn test_blank_second_line_gives_empty_justification() {
        let verdict = parse("Intent: High\n\nReasoning: on the third line");
        assert_eq!(verdict.points, 50);
        assert_eq!(verdict.justification, "");
    }

    #[test]
    fn test_extra_lines_ignored() {
        let verdict = parse("Intent: Low\nReasoning: Student.\nConfidence: 0.9\nMore text");
        assert_eq!(verdict.points, 10);
        assert_eq!(verdict.justification, "Student.");
    }

    #[test]
    fn test_prefix_only_stripped_once_at_start() {
        let verdict = parse("Intent: Medium\nReasoning: Reasoning: duplicated prefix");
        assert_eq!(verdict.justification, "Reasoning: duplicated prefix");
    }

    proptest! {
        #[test]
        fn prop_any_text_parses_or_errors(text in "\\PC*(\n\\PC*){0,3}") {
            if let Ok(verdict) = parse_intent_response(&text) {
                prop_assert!([10, 30, 50].contains(&verdict.points));
                prop_assert!(!verdict.is_fallback());
            }
        }

        #[test]
        fn prop_well_formed_reply_round_trips(
            label in prop_oneof![
                Just(IntentLabel::High), Just(IntentLabel::Medium), Just(IntentLabel::Low)
            ],
            reasoning in "[A-Za-z0-9 .,]{0,40}",
        ) {
            let text = format!("Intent: {}\nReasoning: {}", label, reasoning);
            let verdict = parse_intent_response(&text).unwrap();
            prop_assert_eq!(verdict.label, Some(label));
            prop_assert_eq!(verdict.points, label.reasoning_points());
            prop_assert_eq!(verdict.justification, reasoning.trim());
        }
    }
}
