//! Bounded retry with exponential backoff for transient provider errors.

use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;

use crate::providers::ProviderError;

/// How many times to retry and how long to wait first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: usize,

    /// Delay before the first retry; doubles each time.
    pub min_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            min_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            min_delay: Duration::ZERO,
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_times(self.max_retries)
    }

    /// Run `attempt` until it succeeds, fails with a permanent error, or the
    /// retries run out. The last error is returned.
    pub async fn run<T, F, Fut>(&self, label: &str, attempt: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        attempt
            .retry(self.backoff())
            .sleep(tokio::time::sleep)
            .when(ProviderError::is_retryable)
            .notify(|err: &ProviderError, delay: Duration| {
                tracing::debug!(lead = %label, error = %err, ?delay, "Retrying reasoning call");
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn policy(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            min_delay: Duration::from_millis(10),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_error_is_retried_until_success() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = policy(2)
            .run("lead", || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ProviderError::HttpError("connection reset".into()))
                } else {
                    Ok("ok")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_bounded() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = policy(2)
            .run("lead", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::Timeout(Duration::from_secs(1)))
            })
            .await;

        assert!(matches!(result, Err(ProviderError::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = policy(3)
            .run("lead", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::AuthError)
            })
            .await;

        assert!(matches!(result, Err(ProviderError::AuthError)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_policy_makes_one_attempt() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let _: Result<(), _> = RetryPolicy::none()
            .run("lead", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::HttpError("down".into()))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
