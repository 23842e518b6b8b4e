//! Resilience patterns for leadscore-runtime.
//!
//! - Bounded retry with backoff for transient provider errors
//! - Fallback verdict once retries are exhausted
//!
//! Per-call timeouts live in the reasoning client, which wraps each attempt.

mod fallback;
mod retry;

pub use fallback::{fallback_verdict, FallbackCause};
pub use retry::RetryPolicy;
