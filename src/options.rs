//! Request options and merge rules
//!
//! Per-call overrides (extra headers, query, body fields, timeout, retries)
//! are merged with client-level defaults into one effective set. The merge
//! is a pure function: explicit per-call overrides always win, unset fields
//! fall back silently.

use crate::types::{JsonObject, JsonValue, StringMap};
use std::collections::HashMap;
use std::time::Duration;

// ============================================================================
// Client-level Defaults
// ============================================================================

/// Client-level default options applied to every call
#[derive(Debug, Clone)]
pub struct DefaultOptions {
    /// Headers sent with every request
    pub headers: StringMap,
    /// Query parameters sent with every request
    pub query: StringMap,
    /// Default request timeout
    pub timeout: Duration,
    /// Default maximum retries for retryable failures
    pub max_retries: u32,
}

impl Default for DefaultOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            query: HashMap::new(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

impl DefaultOptions {
    /// Create defaults with the given timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    /// Add a default header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a default query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Per-call Options
// ============================================================================

/// Options for a single call.
///
/// Short-lived value object, never shared across concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers for this call
    pub extra_headers: StringMap,
    /// Extra query parameters for this call
    pub extra_query: StringMap,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
    /// Extra top-level body fields merged over `body`
    pub extra_body: JsonObject,
    /// Override timeout for this call
    pub timeout: Option<Duration>,
    /// Override max retries for this call
    pub max_retries: Option<u32>,
}

impl RequestOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extra header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Add an extra query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_query.insert(key.into(), value.into());
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Add an extra top-level body field
    #[must_use]
    pub fn body_field(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.extra_body.insert(key.into(), value);
        self
    }

    /// Override the timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

// ============================================================================
// Effective Options
// ============================================================================

/// The merged result of defaults and per-call overrides
#[derive(Debug, Clone)]
pub struct EffectiveOptions {
    /// Merged headers (per-call wins on key collision)
    pub headers: StringMap,
    /// Merged query parameters (per-call wins on key collision)
    pub query: StringMap,
    /// Request body with extra fields applied
    pub body: Option<JsonValue>,
    /// Effective timeout
    pub timeout: Duration,
    /// Effective max retries
    pub max_retries: u32,
}

/// Merge client defaults with per-call overrides. Pure function, no I/O.
pub fn merge(defaults: &DefaultOptions, overrides: &RequestOptions) -> EffectiveOptions {
    let mut headers = defaults.headers.clone();
    headers.extend(overrides.extra_headers.clone());

    let mut query = defaults.query.clone();
    query.extend(overrides.extra_query.clone());

    let body = merge_body(overrides.body.clone(), &overrides.extra_body);

    EffectiveOptions {
        headers,
        query,
        body,
        timeout: overrides.timeout.unwrap_or(defaults.timeout),
        max_retries: overrides.max_retries.unwrap_or(defaults.max_retries),
    }
}

/// Apply extra top-level fields over a JSON body.
///
/// A non-object body with extra fields is replaced by an object holding
/// only the extras; extras never silently vanish.
fn merge_body(body: Option<JsonValue>, extra: &JsonObject) -> Option<JsonValue> {
    if extra.is_empty() {
        return body;
    }

    let mut map = match body {
        Some(JsonValue::Object(map)) => map,
        _ => JsonObject::new(),
    };
    for (key, value) in extra {
        map.insert(key.clone(), value.clone());
    }
    Some(JsonValue::Object(map))
}
