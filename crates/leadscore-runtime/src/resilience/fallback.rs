//! Conservative verdict used when the reasoning call cannot produce one.
//!
//! Every failure maps to the same outcome: 10 points and the fixed
//! justification. Only the recorded cause differs.

use std::fmt;

use leadscore_core::ReasoningVerdict;

use crate::providers::ProviderError;
use crate::reasoning::ParseError;

/// Why a lead fell back.
#[derive(Debug)]
pub enum FallbackCause {
    /// The provider call failed after retries, or timed out
    Provider(ProviderError),

    /// The model answered but not in the two-line format
    Malformed(ParseError),
}

impl fmt::Display for FallbackCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackCause::Provider(e) => write!(f, "provider error: {}", e),
            FallbackCause::Malformed(e) => write!(f, "malformed response: {}", e),
        }
    }
}

impl From<ProviderError> for FallbackCause {
    fn from(e: ProviderError) -> Self {
        FallbackCause::Provider(e)
    }
}

impl From<ParseError> for FallbackCause {
    fn from(e: ParseError) -> Self {
        FallbackCause::Malformed(e)
    }
}

/// Log the failure and substitute the fallback verdict.
pub fn fallback_verdict(lead: &str, cause: FallbackCause) -> ReasoningVerdict {
    tracing::warn!(lead = %lead, error = %cause, "Reasoning failed, using fallback verdict");
    ReasoningVerdict::fallback(cause.to_string())
}
