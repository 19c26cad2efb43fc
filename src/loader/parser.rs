//! YAML parser for client definitions
//!
//! Parses, validates and resolves declarative client definitions into
//! ready-to-use [`ApiClient`] instances.

use super::types::{AuthDefinition, ClientDefinition, RateLimitDefinition};
use crate::auth::AuthScheme;
use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::options::DefaultOptions;
use crate::transport::{RateLimiterConfig, RetryPolicy};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Regex for `${ENV_VAR}` placeholders in credential fields
static ENV_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Load and validate a client definition from a YAML file
pub fn load_definition(path: impl AsRef<Path>) -> Result<ClientDefinition> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    load_definition_from_str(&content)
}

/// Load and validate a client definition from a YAML string
pub fn load_definition_from_str(yaml: &str) -> Result<ClientDefinition> {
    let def: ClientDefinition = serde_yaml::from_str(yaml)?;
    validate_definition(&def)?;
    Ok(def)
}

/// Load a client definition and turn it into a ready client
pub fn load_client(path: impl AsRef<Path>) -> Result<ApiClient> {
    build_client(load_definition(path)?)
}

/// Resolve a validated definition into a client
pub fn build_client(def: ClientDefinition) -> Result<ApiClient> {
    debug!(
        name = %def.name,
        schemas = def.schemas.len(),
        resources = def.resources.len(),
        "building client from definition"
    );

    let defaults = DefaultOptions {
        headers: def.headers,
        query: def.query,
        timeout: Duration::from_secs(def.http.timeout_secs),
        max_retries: def.http.max_retries,
    };

    let retry = RetryPolicy::new(
        def.http.backoff.backoff_type,
        Duration::from_millis(def.http.backoff.initial_ms),
        Duration::from_millis(def.http.backoff.max_ms),
    );

    let mut builder = ApiClient::builder()
        .base_url(def.base_url)
        .timeout(Duration::from_secs(def.http.timeout_secs))
        .default_options(defaults)
        .retry_policy(retry);

    if let Some(agent) = def.http.user_agent {
        builder = builder.user_agent(agent);
    }
    if let Some(limit) = def.http.rate_limit {
        builder = builder.rate_limit(rate_limiter_config(&limit));
    }
    if let Some(auth) = def.auth {
        builder = builder.auth(resolve_auth(auth)?);
    }
    if let Some(model) = def.error_model {
        builder = builder.error_model(model);
    }

    for (name, schema) in def.schemas {
        builder = builder.schema(schema.into_schema(&name));
    }
    for (name, resource) in def.resources {
        builder = builder.resource(name, resource);
    }

    builder.build()
}

/// Structural validation of a parsed definition
fn validate_definition(def: &ClientDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::missing_field("name"));
    }
    if def.base_url.is_empty() {
        return Err(Error::missing_field("base_url"));
    }
    Url::parse(&def.base_url)
        .map_err(|e| Error::invalid_field("base_url", e.to_string()))?;

    for name in def.schemas.keys() {
        if name.is_empty() {
            return Err(Error::invalid_field("schemas", "type name must not be empty"));
        }
    }
    for (name, resource) in &def.resources {
        if name.is_empty() {
            return Err(Error::invalid_field(
                "resources",
                "resource name must not be empty",
            ));
        }
        for (op_name, op) in &resource.operations {
            if op.path.is_empty() {
                return Err(Error::invalid_field(
                    format!("{name}.{op_name}.path"),
                    "must not be empty",
                ));
            }
        }
    }

    Ok(())
}

fn rate_limiter_config(def: &RateLimitDefinition) -> RateLimiterConfig {
    RateLimiterConfig::new(
        def.requests_per_second,
        def.burst_size.unwrap_or(def.requests_per_second),
    )
}

/// Resolve an auth definition into a scheme, expanding env placeholders in
/// credential fields.
fn resolve_auth(def: AuthDefinition) -> Result<AuthScheme> {
    let scheme = match def {
        AuthDefinition::None => AuthScheme::None,
        AuthDefinition::ApiKey {
            name,
            value,
            location,
            prefix,
        } => AuthScheme::ApiKey {
            location,
            name,
            prefix,
            value: expand_env(&value)?,
        },
        AuthDefinition::Bearer { token } => AuthScheme::Bearer {
            token: expand_env(&token)?,
        },
        AuthDefinition::Basic { username, password } => AuthScheme::Basic {
            username: expand_env(&username)?,
            password: expand_env(&password)?,
        },
        AuthDefinition::Oauth2ClientCredentials {
            token_url,
            client_id,
            client_secret,
            scopes,
            token_body,
        } => AuthScheme::OAuth2ClientCredentials {
            token_url,
            client_id: expand_env(&client_id)?,
            client_secret: expand_env(&client_secret)?,
            scopes,
            token_body,
        },
        AuthDefinition::Oauth2RefreshToken {
            token_url,
            client_id,
            client_secret,
            refresh_token,
        } => AuthScheme::OAuth2RefreshToken {
            token_url,
            client_id: expand_env(&client_id)?,
            client_secret: expand_env(&client_secret)?,
            refresh_token: expand_env(&refresh_token)?,
        },
        AuthDefinition::Jwt {
            issuer,
            subject,
            audience,
            private_key,
            algorithm,
            token_lifetime_seconds,
            claims,
            token_url,
        } => AuthScheme::Jwt {
            issuer,
            subject,
            audience,
            private_key: expand_env(&private_key)?,
            algorithm,
            token_lifetime_seconds,
            claims,
            token_url,
        },
    };
    Ok(scheme)
}

/// Expand `${ENV_VAR}` placeholders; an unset variable is a config error
pub fn expand_env(value: &str) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;

    for cap in ENV_REGEX.captures_iter(value) {
        let whole = cap.get(0).unwrap();
        let name = cap.get(1).unwrap().as_str();
        let resolved = std::env::var(name)
            .map_err(|_| Error::config(format!("environment variable '{name}' is not set")))?;

        out.push_str(&value[last..whole.start()]);
        out.push_str(&resolved);
        last = whole.end();
    }
    out.push_str(&value[last..]);

    Ok(out)
}
