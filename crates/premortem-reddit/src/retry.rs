//! Retry policy for rate-limited collaborator calls.
//!
//! A 429 from Reddit is a retryable condition: sleep for the indicated
//! `Retry-After` delay and try again, up to `max_retries` extra attempts.
//! Transport failures retry on an exponential schedule. Everything else
//! (unexpected statuses, parse failures) propagates immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::RedditError;

/// Returns `true` if `err` represents a transient condition worth retrying.
fn is_retriable(err: &RedditError) -> bool {
    matches!(
        err,
        RedditError::RateLimited { .. } | RedditError::Http(_)
    )
}

/// Shared retry schedule for collaborator calls that may be rate-limited.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first try.
    pub max_retries: u32,
    /// Base delay in seconds when the server gives no `Retry-After`.
    pub backoff_base_secs: u64,
}

impl Default for RetryPolicy {
    /// Retry once after the indicated delay — matches Reddit's documented
    /// expectation for unauthenticated clients.
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff_base_secs: 3,
        }
    }
}

impl RetryPolicy {
    /// Executes `operation`, retrying transient errors per the policy.
    ///
    /// A [`RedditError::RateLimited`] sleeps for the server-indicated delay;
    /// other retriable errors back off exponentially from
    /// `backoff_base_secs`. The last error is returned once the budget is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns the first non-retriable error, or the last retriable error
    /// after `max_retries` extra attempts.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, RedditError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RedditError>>,
    {
        let mut attempt = 0u32;

        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !is_retriable(&err) || attempt >= self.max_retries {
                return Err(err);
            }

            let delay_secs = match &err {
                RedditError::RateLimited { retry_after_secs } if *retry_after_secs > 0 => {
                    *retry_after_secs
                }
                _ => self
                    .backoff_base_secs
                    .saturating_mul(1u64 << attempt.min(62)),
            };
            tracing::warn!(
                attempt,
                max_retries = self.max_retries,
                delay_secs,
                error = %err,
                "transient Reddit error, retrying after delay"
            );
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            attempt += 1;
        }
    }
}
