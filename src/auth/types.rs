//! Auth scheme types
//!
//! These types represent the resolved auth configuration for a client,
//! after any definition-level placeholders have been filled in.

use crate::types::JwtAlgorithm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in an HTTP header
    #[default]
    Header,
    /// Place in a query parameter
    Query,
}

/// Authentication scheme for a client
#[derive(Debug, Clone, Default)]
pub enum AuthScheme {
    /// No authentication
    #[default]
    None,

    /// API key in a header or query parameter
    ApiKey {
        /// Where to place the key
        location: Location,
        /// Header or query parameter name
        name: String,
        /// Prefix prepended to the value (e.g. "Bearer ")
        prefix: Option<String>,
        /// The key value
        value: String,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// Static bearer token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// OAuth2 client credentials flow
    OAuth2ClientCredentials {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Requested scopes
        scopes: Vec<String>,
        /// Additional token request body parameters
        token_body: HashMap<String, String>,
    },

    /// OAuth2 refresh token flow
    OAuth2RefreshToken {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Refresh token
        refresh_token: String,
    },

    /// JWT assertion auth (service account style)
    Jwt {
        /// Token issuer (iss claim)
        issuer: String,
        /// Token subject (sub claim, optional)
        subject: Option<String>,
        /// Token audience (aud claim)
        audience: String,
        /// Private key for signing (PEM format)
        private_key: String,
        /// Signing algorithm
        algorithm: JwtAlgorithm,
        /// Token lifetime in seconds
        token_lifetime_seconds: u64,
        /// Additional claims
        claims: HashMap<String, String>,
        /// Optional token endpoint for two-step exchange (Google-style)
        token_url: Option<String>,
    },
}

impl AuthScheme {
    /// Whether this scheme obtains tokens over the network or by signing
    pub fn uses_token_cache(&self) -> bool {
        matches!(
            self,
            Self::OAuth2ClientCredentials { .. } | Self::OAuth2RefreshToken { .. } | Self::Jwt { .. }
        )
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired, with a 30 second refresh buffer
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
