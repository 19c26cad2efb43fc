//! Client core and builder
//!
//! An [`ApiClient`] bundles one transport, one schema registry and one set
//! of default options, and hands out [`Resource`] façades by name. The core
//! is shared behind an `Arc`; façades are cheap to create and safe to use
//! from concurrent tasks.

use crate::auth::AuthScheme;
use crate::error::{Error, Result};
use crate::options::DefaultOptions;
use crate::resource::{Resource, ResourceDef};
use crate::schema::{Schema, SchemaRegistry};
use crate::transport::{RateLimiterConfig, RetryPolicy, Transport, TransportConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Shared state behind every façade of one client
pub(crate) struct ClientCore {
    pub(crate) transport: Transport,
    pub(crate) registry: Arc<SchemaRegistry>,
    pub(crate) defaults: DefaultOptions,
    pub(crate) retry: RetryPolicy,
    pub(crate) error_model: Option<String>,
}

/// A typed client for one remote API
pub struct ApiClient {
    core: Arc<ClientCore>,
    resources: HashMap<String, Arc<ResourceDef>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("resources", &self.resource_names())
            .field("types", &self.core.registry.len())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Look up a resource façade by name
    pub fn resource(&self, name: &str) -> Result<Resource> {
        let def = self
            .resources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ResourceNotFound {
                name: name.to_string(),
            })?;
        Ok(Resource::new(name, def, self.core.clone()))
    }

    /// Names of all declared resources, sorted
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The schema registry backing this client
    pub fn registry(&self) -> &SchemaRegistry {
        &self.core.registry
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    rate_limit: Option<RateLimiterConfig>,
    no_rate_limit: bool,
    auth: Option<AuthScheme>,
    schemas: Vec<Schema>,
    resources: HashMap<String, ResourceDef>,
    defaults: DefaultOptions,
    retry: RetryPolicy,
    error_model: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL all operation paths resolve against
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the client-level timeout (also the default per-call timeout)
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Configure rate limiting
    #[must_use]
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    #[must_use]
    pub fn no_rate_limit(mut self) -> Self {
        self.no_rate_limit = true;
        self
    }

    /// Set the authentication scheme
    #[must_use]
    pub fn auth(mut self, scheme: AuthScheme) -> Self {
        self.auth = Some(scheme);
        self
    }

    /// Add a schema to the registry
    #[must_use]
    pub fn schema(mut self, schema: impl Into<Schema>) -> Self {
        self.schemas.push(schema.into());
        self
    }

    /// Add a resource definition
    #[must_use]
    pub fn resource(mut self, name: impl Into<String>, def: ResourceDef) -> Self {
        self.resources.insert(name.into(), def);
        self
    }

    /// Set the client-level default options
    #[must_use]
    pub fn default_options(mut self, defaults: DefaultOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Name the model error response bodies decode against
    #[must_use]
    pub fn error_model(mut self, model: impl Into<String>) -> Self {
        self.error_model = Some(model.into());
        self
    }

    /// Build the client.
    ///
    /// Registers all schemas, checks that every type reference (including
    /// operation request/response/error models) resolves, and opens the
    /// transport.
    pub fn build(self) -> Result<ApiClient> {
        let mut registry = SchemaRegistry::new();
        for schema in self.schemas {
            registry.register(schema)?;
        }
        registry.validate_references()?;

        for (name, def) in &self.resources {
            def.validate(name, &registry)?;
        }
        if let Some(model) = &self.error_model {
            registry.resolve(model)?;
        }

        let mut config = TransportConfig::builder();
        if let Some(url) = self.base_url {
            config = config.base_url(url);
        }
        if let Some(timeout) = self.timeout {
            config = config.timeout(timeout);
        }
        if let Some(agent) = self.user_agent {
            config = config.user_agent(agent);
        }
        if self.no_rate_limit {
            config = config.no_rate_limit();
        } else if let Some(limit) = self.rate_limit {
            config = config.rate_limit(limit);
        }
        let config = config.build();

        let transport = match self.auth {
            Some(scheme) => Transport::with_auth(config, scheme)?,
            None => Transport::with_config(config)?,
        };

        let mut defaults = self.defaults;
        if let Some(timeout) = self.timeout {
            defaults.timeout = timeout;
        }

        Ok(ApiClient {
            core: Arc::new(ClientCore {
                transport,
                registry: Arc::new(registry),
                defaults,
                retry: self.retry,
                error_model: self.error_model,
            }),
            resources: self
                .resources
                .into_iter()
                .map(|(name, def)| (name, Arc::new(def)))
                .collect(),
        })
    }
}
