//! Authenticator implementation
//!
//! Applies an auth scheme to outgoing requests and manages token refresh
//! for the flows that need one.

use super::types::{AuthScheme, CachedToken, Location};
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth scheme
    scheme: AuthScheme,
    /// Cached token for OAuth2/JWT flows
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given scheme
    pub fn new(scheme: AuthScheme) -> Self {
        Self::with_client(scheme, Client::new())
    }

    /// Create an authenticator that reuses an existing HTTP client
    pub fn with_client(scheme: AuthScheme, http_client: Client) -> Self {
        Self {
            scheme,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.scheme {
            AuthScheme::None => Ok(req),

            AuthScheme::ApiKey {
                location,
                name,
                prefix,
                value,
            } => {
                let val = format!("{}{}", prefix.as_deref().unwrap_or(""), value);
                match location {
                    Location::Header => Ok(req.header(name.as_str(), val)),
                    Location::Query => Ok(req.query(&[(name.as_str(), val)])),
                }
            }

            AuthScheme::Basic { username, password } => {
                Ok(req.basic_auth(username, Some(password)))
            }

            AuthScheme::Bearer { token } => Ok(req.bearer_auth(token)),

            AuthScheme::OAuth2ClientCredentials { .. }
            | AuthScheme::OAuth2RefreshToken { .. }
            | AuthScheme::Jwt { .. } => {
                let token = self.get_or_refresh_token().await?;
                Ok(req.bearer_auth(token))
            }
        }
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(&self) -> Result<String> {
        // Fast path under the read lock
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Double-check after acquiring the write lock; another task may
        // have refreshed while we waited.
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_new_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Fetch a new token based on the scheme
    async fn fetch_new_token(&self) -> Result<CachedToken> {
        match &self.scheme {
            AuthScheme::OAuth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scopes,
                token_body,
            } => {
                self.fetch_client_credentials(token_url, client_id, client_secret, scopes, token_body)
                    .await
            }

            AuthScheme::OAuth2RefreshToken {
                token_url,
                client_id,
                client_secret,
                refresh_token,
            } => {
                self.fetch_refresh_token(token_url, client_id, client_secret, refresh_token)
                    .await
            }

            AuthScheme::Jwt {
                issuer,
                subject,
                audience,
                private_key,
                algorithm,
                token_lifetime_seconds,
                claims,
                token_url,
            } => {
                self.generate_jwt(
                    issuer,
                    subject.as_deref(),
                    audience,
                    private_key,
                    *algorithm,
                    *token_lifetime_seconds,
                    claims,
                    token_url.as_deref(),
                )
                .await
            }

            _ => Err(Error::auth("Token refresh not supported for this scheme")),
        }
    }

    /// OAuth2 client credentials flow
    async fn fetch_client_credentials(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
        scopes: &[String],
        extra_body: &HashMap<String, String>,
    ) -> Result<CachedToken> {
        let mut form = vec![
            ("grant_type", "client_credentials".to_string()),
            ("client_id", client_id.to_string()),
            ("client_secret", client_secret.to_string()),
        ];

        if !scopes.is_empty() {
            form.push(("scope", scopes.join(" ")));
        }

        for (key, value) in extra_body {
            form.push((key.as_str(), value.clone()));
        }

        let response = self
            .http_client
            .post(token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::OAuth2 {
                message: format!("Token request failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Transport)?;
        Ok(token_response.into_cached_token())
    }

    /// OAuth2 refresh token flow
    async fn fetch_refresh_token(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<CachedToken> {
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
        ];

        let response = self
            .http_client
            .post(token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRefresh {
                message: format!("Refresh token request failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Transport)?;
        Ok(token_response.into_cached_token())
    }

    /// Generate a JWT and optionally exchange it for an access token
    #[allow(clippy::too_many_arguments)]
    async fn generate_jwt(
        &self,
        issuer: &str,
        subject: Option<&str>,
        audience: &str,
        private_key: &str,
        algorithm: crate::types::JwtAlgorithm,
        lifetime_seconds: u64,
        extra_claims: &HashMap<String, String>,
        token_url: Option<&str>,
    ) -> Result<CachedToken> {
        let now = Utc::now().timestamp();
        #[allow(clippy::cast_possible_wrap)]
        let exp = now + lifetime_seconds as i64;

        let claims = JwtClaims {
            iss: issuer.to_string(),
            sub: subject.map(String::from),
            aud: audience.to_string(),
            iat: now,
            exp,
            extra: extra_claims.clone(),
        };

        let header = Header::new(algorithm.into());

        let encoding_key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
            Error::JwtGeneration {
                message: format!("Invalid private key: {e}"),
            }
        })?;

        let jwt = encode(&header, &claims, &encoding_key).map_err(|e| Error::JwtGeneration {
            message: format!("Failed to encode JWT: {e}"),
        })?;

        // Two-step exchange: trade the signed assertion for an access token
        if let Some(url) = token_url {
            let form = [
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ];

            let response = self
                .http_client
                .post(url)
                .form(&form)
                .send()
                .await
                .map_err(Error::Transport)?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::JwtGeneration {
                    message: format!("JWT token exchange failed with status {status}: {body}"),
                });
            }

            let token_response: TokenResponse = response.json().await.map_err(Error::Transport)?;
            Ok(token_response.into_cached_token())
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(CachedToken::expires_in(jwt, lifetime_seconds as i64))
        }
    }

    /// Clear the cached token (forces a refresh on the next call)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Get the configured scheme
    pub fn scheme(&self) -> &AuthScheme {
        &self.scheme
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("scheme", &std::mem::discriminant(&self.scheme))
            .finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    aud: String,
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    extra: HashMap<String, String>,
}
