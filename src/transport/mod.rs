//! HTTP transport
//!
//! Owns the underlying connection pool, applies default headers, auth,
//! per-call timeouts and rate limiting. A single [`Transport::execute`]
//! performs exactly one attempt; retry policy is a collaborator above this
//! layer ([`RetryPolicy`]).

mod client;
mod rate_limit;
mod retry;

#[cfg(test)]
mod tests;

pub use client::{Transport, TransportConfig, TransportConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::{execute_with_retry, retry_after, RetryPolicy};
