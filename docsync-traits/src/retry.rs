//! Retry Policy
//!
//! One backoff policy shared by every collaborator call. The engine wraps
//! source and store operations in [`with_backoff`]; HTTP transports reuse
//! [`RetryPolicy::delay_for`] for status-level retries so the timing
//! behavior is uniform everywhere.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::Result;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Base delay between retries
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry attempt (1-based), exponential with
    /// jitter and capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.max_delay);
        exponential + jitter()
    }
}

/// Random jitter in the 0-100ms range, derived from `RandomState` hashing
/// so no extra dependency is needed.
fn jitter() -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let hasher = RandomState::new().build_hasher();
    Duration::from_millis(hasher.finish() % 100)
}

/// Run an async operation, retrying transient failures with exponential
/// backoff.
///
/// Permanent errors ([`ConnectorError::is_transient`] returning false) are
/// surfaced immediately. Exhausting the attempt budget surfaces the last
/// transient error; nothing is ever dropped silently.
pub async fn with_backoff<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt + 1 < policy.max_attempts => {
                attempt += 1;
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
