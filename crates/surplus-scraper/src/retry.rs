//! Fixed-delay retry for page and session fetches.
//!
//! Transport and format failures are retried up to a fixed number of total
//! attempts with the same pause between each. Anything else is returned
//! immediately. Exhausting the budget wraps the last error in
//! [`ScraperError::RetriesExhausted`].

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Retry budget shared by every network step of one county run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Always at least 1.
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay_ms,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000)
    }
}

/// Runs `op` until it succeeds, fails with a non-retriable error, or has been
/// attempted `policy.max_attempts` times.
///
/// `operation` names the step in logs and in the exhaustion error, e.g.
/// `"detail page 3"`.
pub(crate) async fn retry_fixed<T, F, Fut>(
    policy: RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retriable() {
            return Err(err);
        }

        if attempt >= max_attempts {
            tracing::error!(
                operation,
                attempts = attempt,
                error = %err,
                "retries exhausted"
            );
            return Err(ScraperError::RetriesExhausted {
                operation: operation.to_owned(),
                attempts: attempt,
                source: Box::new(err),
            });
        }

        tracing::warn!(
            operation,
            attempt,
            max_attempts,
            delay_ms = policy.delay_ms,
            error = %err,
            "attempt failed, retrying after fixed delay"
        );
        if policy.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(policy.delay_ms)).await;
        }
    }
}
