//! Transport implementation
//!
//! One `execute` call is one network attempt. Network-level faults (DNS,
//! connect, timeout) surface as transport errors, distinct from responses
//! that carry an HTTP error status; those are returned as-is for the
//! resource layer to classify.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthScheme, Authenticator};
use crate::error::{Error, Result};
use crate::options::EffectiveOptions;
use crate::types::Method;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Configuration for the transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Client-level request timeout (per-call override wins)
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("wireclient/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Create a new config builder
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

/// Builder for transport config
#[derive(Default)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the client-level timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> TransportConfig {
        self.config
    }
}

/// HTTP transport shared by all façades of one client
pub struct Transport {
    client: Client,
    config: TransportConfig,
    authenticator: Option<Authenticator>,
    rate_limiter: Option<RateLimiter>,
}

impl Transport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Transport)?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: None,
            rate_limiter,
        })
    }

    /// Create a transport with authentication
    pub fn with_auth(config: TransportConfig, scheme: AuthScheme) -> Result<Self> {
        let mut transport = Self::with_config(config)?;
        transport.authenticator = Some(Authenticator::with_client(
            scheme,
            transport.client.clone(),
        ));
        Ok(transport)
    }

    /// Set the authenticator, reusing this transport's connection pool
    pub fn set_auth(&mut self, scheme: AuthScheme) {
        self.authenticator = Some(Authenticator::with_client(scheme, self.client.clone()));
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// The configured client-level timeout
    pub fn default_timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Execute exactly one request attempt.
    ///
    /// Returns the response whatever its status; classification of error
    /// statuses happens in the resource layer. Network faults map to
    /// [`Error::Timeout`] or [`Error::Transport`].
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        opts: &EffectiveOptions,
    ) -> Result<Response> {
        let full_url = self.build_url(path);

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self
            .client
            .request(method.into(), &full_url)
            .timeout(opts.timeout);

        for (key, value) in &opts.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !opts.query.is_empty() {
            req = req.query(&opts.query);
        }

        if let Some(ref body) = opts.body {
            req = req.json(body);
        }

        if let Some(ref auth) = self.authenticator {
            req = auth.apply(req).await?;
        }

        match req.send().await {
            Ok(response) => {
                debug!(
                    status = response.status().as_u16(),
                    %full_url,
                    "request completed"
                );
                Ok(response)
            }
            Err(e) if e.is_timeout() => Err(Error::Timeout {
                timeout_ms: opts.timeout.as_millis() as u64,
            }),
            Err(e) => Err(Error::Transport(e)),
        }
    }

    /// Build the full URL from a path or pass an absolute URL through
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
