use std::future::Future;
use std::time::Duration;

/// Bounded retry strategy for read queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of tries, including the first one. Always at least 1.
    pub attempts: u32,
    /// Pause before the first retry.
    pub delay: Duration,
    /// Multiplier applied to the pause after every failed retry.
    pub backoff: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(200),
            backoff: 2,
        }
    }
}

impl RetryPolicy {
    /// A policy that tries once and never sleeps.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
            backoff: 1,
        }
    }
}

/// Connectivity-level failures that are worth another try. Query errors
/// reported by the database itself are not.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Tls(_)
    )
}

/// Runs `op` until it succeeds, fails with a non-transient error, or the
/// policy runs out of attempts. Only use this for idempotent reads.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let attempts = policy.attempts.max(1);
    let mut delay = policy.delay;
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts && is_transient(&e) => {
                tracing::warn!(
                    "{} failed (attempt {}/{}), retrying in {:?}: {}",
                    what,
                    attempt,
                    attempts,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(policy.backoff.max(1));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
