//! Retry policy
//!
//! The transport performs single attempts; this collaborator re-drives it
//! for retryable failures: network faults, timeouts, 429 and 5xx statuses.
//! Validation and decode failures never reach this layer.

use super::client::Transport;
use crate::error::{is_retryable_status, Result};
use crate::options::EffectiveOptions;
use crate::types::{BackoffType, Method};
use reqwest::Response;
use std::time::Duration;
use tracing::warn;

/// Backoff configuration for retries
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given backoff settings
    pub fn new(backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        Self {
            initial_backoff: initial,
            max_backoff: max,
            backoff_type,
        }
    }

    /// Delay before the given retry attempt (0-based).
    ///
    /// Multiplication saturates at `max_backoff` so large attempt counts
    /// never overflow the `Duration`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = match self.backoff_type {
            BackoffType::Constant => self.initial_backoff,
            BackoffType::Linear => self
                .initial_backoff
                .checked_mul(attempt.saturating_add(1))
                .unwrap_or(self.max_backoff),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.initial_backoff
                    .checked_mul(factor)
                    .unwrap_or(self.max_backoff)
            }
        };

        std::cmp::min(delay, self.max_backoff)
    }
}

/// Execute a request, retrying retryable failures up to
/// `opts.max_retries` additional attempts.
///
/// A response with an error status is returned as `Ok` once retries are
/// exhausted; classifying it is the caller's job. Transport faults that
/// persist surface as the last error seen.
pub async fn execute_with_retry(
    transport: &Transport,
    policy: &RetryPolicy,
    method: Method,
    path: &str,
    opts: &EffectiveOptions,
) -> Result<Response> {
    let max_retries = opts.max_retries;
    let mut attempt = 0;

    loop {
        match transport.execute(method, path, opts).await {
            Ok(response) => {
                let status = response.status().as_u16();

                if is_retryable_status(status) && attempt < max_retries {
                    let delay = if status == 429 {
                        retry_after(&response)
                            .map(Duration::from_secs)
                            .unwrap_or_else(|| policy.delay_for_attempt(attempt))
                    } else {
                        policy.delay_for_attempt(attempt)
                    };

                    warn!(
                        status,
                        attempt = attempt + 1,
                        max = max_retries + 1,
                        ?delay,
                        "retryable status, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }

                return Ok(response);
            }
            Err(e) if e.is_retryable() && attempt < max_retries => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    error = %e,
                    attempt = attempt + 1,
                    max = max_retries + 1,
                    ?delay,
                    "transport fault, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Parse the Retry-After header of a throttling response, if present
pub fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
}
