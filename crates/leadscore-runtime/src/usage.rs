//! LLM usage accounting.
//!
//! Each lead carries its own [`LlmUsage`]; a batch sums them after every lead
//! finishes, so no counter is shared between tasks.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::AddAssign;

use crate::providers::TokenUsage;

/// Accumulated LLM usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    /// Provider calls made, retries included
    pub llm_calls: u32,

    pub prompt_tokens: u32,

    pub completion_tokens: u32,

    pub total_tokens: u32,
}

impl LlmUsage {
    /// Record token counts reported by a successful call.
    pub fn add(&mut self, usage: &TokenUsage) {
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
        self.total_tokens += usage.total();
    }

    /// Count calls without token data (failed attempts).
    pub fn record_calls(&mut self, calls: u32) {
        self.llm_calls += calls;
    }
}

impl AddAssign for LlmUsage {
    fn add_assign(&mut self, other: Self) {
        self.llm_calls += other.llm_calls;
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

impl Sum for LlmUsage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(LlmUsage::default(), |mut acc, usage| {
            acc += usage;
            acc
        })
    }
}
