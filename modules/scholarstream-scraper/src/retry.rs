//! Bounded exponential-backoff retry for fallible async operations.

use std::future::Future;
use std::time::Duration;

use scholarstream_common::RetryConfig;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Max retry count; total attempts = retries + 1.
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(cfg: RetryConfig) -> Self {
        Self {
            retries: cfg.retries,
            base_delay: Duration::from_millis(cfg.base_delay_ms),
            max_delay: Duration::from_millis(cfg.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// `min(base × 2^attempt, max)`, attempt counted from 0 for the first retry.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

/// Run `op`, retrying per `policy`. On exhaustion the final error is
/// returned unchanged so callers can still branch on its kind.
pub async fn execute_with_retry<T, E, F, Fut>(policy: &RetryPolicy, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    execute_with_retry_observed(policy, op, |_, _| {}).await
}

/// Like [`execute_with_retry`], with `on_retry(attempt, &err)` invoked before
/// each re-attempt (never before the first attempt).
pub async fn execute_with_retry_observed<T, E, F, Fut, O>(
    policy: &RetryPolicy,
    mut op: F,
    mut on_retry: O,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    O: FnMut(u32, &E),
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= policy.retries {
                    return Err(err);
                }
                let delay = policy.backoff(attempt);
                on_retry(attempt + 1, &err);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
