//! Loader types
//!
//! Declarative client definition types for YAML parsing. These are the
//! unresolved document shapes; `${ENV_VAR}` placeholders in credential
//! fields are expanded when the definition is turned into a client.

use crate::auth::Location;
use crate::resource::ResourceDef;
use crate::schema::{EnumSchema, ModelSchema, OneOfSchema, Schema};
use crate::schema::FieldDef;
use crate::types::{BackoffType, JwtAlgorithm, StringMap, UnknownFields};
use serde::Deserialize;
use std::collections::BTreeMap;

// ============================================================================
// Client Definition
// ============================================================================

/// Top-level client definition
#[derive(Debug, Clone, Deserialize)]
pub struct ClientDefinition {
    /// Client name
    pub name: String,
    /// Definition version
    #[serde(default = "default_version")]
    pub version: String,
    /// Base URL all operation paths resolve against
    pub base_url: String,
    /// Authentication configuration
    #[serde(default)]
    pub auth: Option<AuthDefinition>,
    /// HTTP tuning
    #[serde(default)]
    pub http: HttpDefinition,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
    /// Query parameters sent with every request
    #[serde(default)]
    pub query: StringMap,
    /// Model error response bodies decode against
    #[serde(default)]
    pub error_model: Option<String>,
    /// Named type schemas
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaDefinition>,
    /// Named resources
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceDef>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

// ============================================================================
// Schema Definition
// ============================================================================

/// One named type in the `schemas` map.
///
/// The shape disambiguates the kind: `values` declares an enum, `one_of`
/// a composition, `fields` a model.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaDefinition {
    /// Closed string enum
    Enum {
        /// Allowed wire values
        values: Vec<String>,
    },
    /// Ordered oneOf composition
    OneOf {
        /// Candidate type names, tried in order
        one_of: Vec<String>,
    },
    /// Named model
    Model {
        /// Declared fields
        fields: Vec<FieldDef>,
        /// Undeclared wire field policy
        #[serde(default)]
        unknown_fields: UnknownFields,
    },
}

impl SchemaDefinition {
    /// Turn the definition into a registrable schema under the given name
    pub fn into_schema(self, name: &str) -> Schema {
        match self {
            Self::Enum { values } => Schema::Enum(EnumSchema {
                name: name.to_string(),
                values,
            }),
            Self::OneOf { one_of } => Schema::OneOf(OneOfSchema {
                name: name.to_string(),
                candidates: one_of,
            }),
            Self::Model {
                fields,
                unknown_fields,
            } => Schema::Model(ModelSchema {
                name: name.to_string(),
                fields,
                unknown_fields,
            }),
        }
    }
}

// ============================================================================
// Auth Definition
// ============================================================================

/// Authentication definition
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDefinition {
    /// No authentication
    None,
    /// API key in a header or query parameter
    ApiKey {
        /// Header or query parameter name
        name: String,
        /// Key value; supports `${ENV_VAR}` placeholders
        value: String,
        /// Where to place the key
        #[serde(default)]
        location: Location,
        /// Prefix prepended to the value
        #[serde(default)]
        prefix: Option<String>,
    },
    /// Static bearer token
    Bearer {
        /// Token value; supports `${ENV_VAR}` placeholders
        token: String,
    },
    /// HTTP Basic authentication
    Basic {
        /// Username; supports `${ENV_VAR}` placeholders
        username: String,
        /// Password; supports `${ENV_VAR}` placeholders
        password: String,
    },
    /// OAuth2 client credentials flow
    Oauth2ClientCredentials {
        /// Token endpoint URL
        token_url: String,
        /// Client ID; supports `${ENV_VAR}` placeholders
        client_id: String,
        /// Client secret; supports `${ENV_VAR}` placeholders
        client_secret: String,
        /// Requested scopes
        #[serde(default)]
        scopes: Vec<String>,
        /// Additional token request body parameters
        #[serde(default)]
        token_body: StringMap,
    },
    /// OAuth2 refresh token flow
    Oauth2RefreshToken {
        /// Token endpoint URL
        token_url: String,
        /// Client ID; supports `${ENV_VAR}` placeholders
        client_id: String,
        /// Client secret; supports `${ENV_VAR}` placeholders
        client_secret: String,
        /// Refresh token; supports `${ENV_VAR}` placeholders
        refresh_token: String,
    },
    /// JWT assertion auth
    Jwt {
        /// Token issuer
        issuer: String,
        /// Token subject
        #[serde(default)]
        subject: Option<String>,
        /// Token audience
        audience: String,
        /// PEM private key; supports `${ENV_VAR}` placeholders
        private_key: String,
        /// Signing algorithm
        #[serde(default)]
        algorithm: JwtAlgorithm,
        /// Token lifetime in seconds
        #[serde(default = "default_token_lifetime")]
        token_lifetime_seconds: u64,
        /// Additional claims
        #[serde(default)]
        claims: StringMap,
        /// Optional token endpoint for two-step exchange
        #[serde(default)]
        token_url: Option<String>,
    },
}

fn default_token_lifetime() -> u64 {
    3600
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP tuning for a client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpDefinition {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum retries for retryable failures
    pub max_retries: u32,
    /// Rate limiting; absent means the default limiter
    pub rate_limit: Option<RateLimitDefinition>,
    /// User agent override
    pub user_agent: Option<String>,
    /// Retry backoff
    pub backoff: BackoffDefinition,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
            rate_limit: None,
            user_agent: None,
            backoff: BackoffDefinition::default(),
        }
    }
}

/// Rate limit settings
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitDefinition {
    /// Requests per second
    pub requests_per_second: u32,
    /// Burst size; defaults to the request rate
    #[serde(default)]
    pub burst_size: Option<u32>,
}

/// Retry backoff settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackoffDefinition {
    /// Backoff strategy
    pub backoff_type: BackoffType,
    /// Initial delay in milliseconds
    pub initial_ms: u64,
    /// Maximum delay in milliseconds
    pub max_ms: u64,
}

impl Default for BackoffDefinition {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: 100,
            max_ms: 60_000,
        }
    }
}
