//! Error types for wireclient
//!
//! This module defines the error hierarchy for the entire runtime.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde_json::Value;
use thiserror::Error;

/// The main error type for wireclient
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Caller Input Errors (detected before any network call)
    // ============================================================================
    #[error("Invalid value for parameter '{param}': {message}")]
    Validation { param: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required definition field: {field}")]
    MissingField { field: String },

    #[error("Invalid definition value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token refresh failed: {message}")]
    TokenRefresh { message: String },

    #[error("JWT generation failed: {message}")]
    JwtGeneration { message: String },

    #[error("OAuth2 error: {message}")]
    OAuth2 { message: String },

    // ============================================================================
    // Transport Errors (no response received)
    // ============================================================================
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // HTTP Status Errors (response received with error status)
    // ============================================================================
    #[error(transparent)]
    Status(#[from] StatusError),

    // ============================================================================
    // Schema / Decode Errors
    // ============================================================================
    #[error("Failed to decode '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("Unknown type reference: {name}")]
    UnknownType { name: String },

    #[error("Duplicate type registration: {name}")]
    DuplicateType { name: String },

    // ============================================================================
    // Definition Lookup Errors
    // ============================================================================
    #[error("Resource '{name}' not found in client definition")]
    ResourceNotFound { name: String },

    #[error("Operation '{operation}' not found on resource '{resource}'")]
    OperationNotFound { resource: String, operation: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Classification of an HTTP error status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// 404
    NotFound,
    /// 401 or 403
    Auth,
    /// 422
    Unprocessable,
    /// 429
    Throttled,
    /// Everything else >= 300
    Service,
}

impl StatusKind {
    /// Classify a status code
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            401 | 403 => Self::Auth,
            422 => Self::Unprocessable,
            429 => Self::Throttled,
            _ => Self::Service,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::Auth => "authentication",
            Self::Unprocessable => "unprocessable entity",
            Self::Throttled => "throttled",
            Self::Service => "service",
        }
    }
}

/// Error envelope for an HTTP response with an error status.
///
/// Carries enough context to reproduce the failing call without re-running
/// it: the request path, the status, the raw body, and the decoded error
/// model when one was declared and decodable.
#[derive(Error, Debug)]
#[error("HTTP {status} ({kind}) for {path}: {body}", kind = .kind.name())]
pub struct StatusError {
    /// Status classification
    pub kind: StatusKind,
    /// HTTP status code
    pub status: u16,
    /// Request path that produced the error
    pub path: String,
    /// Raw response body text
    pub body: String,
    /// Decoded error model, if an error schema was declared and matched
    pub decoded: Option<Value>,
    /// Retry-After value in seconds, for throttling responses
    pub retry_after_seconds: Option<u64>,
}

impl StatusError {
    /// Build an envelope from a status code and raw body
    pub fn new(status: u16, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::from_status(status),
            status,
            path: path.into(),
            body: body.into(),
            decoded: None,
            retry_after_seconds: None,
        }
    }

    /// Attach a decoded error model
    #[must_use]
    pub fn with_decoded(mut self, decoded: Value) -> Self {
        self.decoded = Some(decoded);
        self
    }

    /// Attach a Retry-After hint
    #[must_use]
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after_seconds = Some(seconds);
        self
    }
}

impl Error {
    /// Create a validation error naming the offending parameter
    pub fn validation(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a decode error with a path into the wire document
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    /// The status envelope, if this is a status error
    pub fn status_error(&self) -> Option<&StatusError> {
        match self {
            Self::Status(e) => Some(e),
            _ => None,
        }
    }

    /// Check if this error is a candidate for caller-directed retry.
    ///
    /// Validation and decode errors are never retryable; transport faults
    /// and throttling are.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Timeout { .. } => true,
            Error::Status(e) => is_retryable_status(e.status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for wireclient
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
