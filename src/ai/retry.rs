//! Generation Retry Wrapper
//!
//! Exponential backoff around model calls. Only transient categories are
//! retried: rate limits, service unavailability, network failures, and
//! transient upstream errors. The delay after failed attempt `k`
//! (1-based) is `2^k * base_delay`, so with the default base of one
//! second a three-attempt call waits 2s then 4s.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants;
use crate::types::Result;

/// Retry policy for one generation call
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: constants::ai::MAX_RETRIES,
            base_delay: Duration::from_millis(constants::ai::RETRY_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run `op` with exponential backoff per `policy`.
///
/// Non-retryable errors propagate immediately; exhaustion propagates the
/// last error.
pub async fn retry_generation<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !e.is_retryable() || attempt >= policy.max_attempts {
                    if attempt > 1 {
                        warn!(attempt, error = %e, "Generation failed after retries");
                    }
                    return Err(e);
                }
                let delay = policy.delay_after(attempt);
                debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retryable generation failure, backing off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
