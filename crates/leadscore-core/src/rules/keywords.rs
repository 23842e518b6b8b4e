//! Keyword sets used by the role and industry criteria.
//!
//! Each set compiles to a single alternation so a lookup is one scan of the
//! (already lower-cased) input. Matching is plain substring matching: "vp"
//! also matches inside "mvp".

use lazy_static::lazy_static;
use regex::Regex;

/// Role keywords that mark a decision maker (20 points).
pub const DECISION_MAKER_KEYWORDS: &[&str] = &[
    "head",
    "vp",
    "vice president",
    "director",
    "manager",
    "ceo",
    "founder",
    "chief",
];

/// Role keywords that mark an influencer (10 points).
pub const INFLUENCER_KEYWORDS: &[&str] = &["engineer", "developer", "architect", "consultant", "analyst"];

/// Industry keywords that mark an adjacent industry (10 points).
pub const ADJACENT_INDUSTRY_KEYWORDS: &[&str] = &["saas", "b2b"];

fn keyword_pattern(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("escaped keyword alternation is a valid pattern")
}

lazy_static! {
    pub static ref DECISION_MAKER_PATTERN: Regex = keyword_pattern(DECISION_MAKER_KEYWORDS);
    pub static ref INFLUENCER_PATTERN: Regex = keyword_pattern(INFLUENCER_KEYWORDS);
    pub static ref ADJACENT_INDUSTRY_PATTERN: Regex = keyword_pattern(ADJACENT_INDUSTRY_KEYWORDS);
}

/// First decision-maker keyword found in a lower-cased role.
pub fn decision_maker_keyword(role: &str) -> Option<&str> {
    DECISION_MAKER_PATTERN.find(role).map(|m| m.as_str())
}

/// First influencer keyword found in a lower-cased role.
pub fn influencer_keyword(role: &str) -> Option<&str> {
    INFLUENCER_PATTERN.find(role).map(|m| m.as_str())
}

/// First adjacent-industry keyword found in a lower-cased industry.
pub fn adjacent_industry_keyword(industry: &str) -> Option<&str> {
    ADJACENT_INDUSTRY_PATTERN.find(industry).map(|m| m.as_str())
}
