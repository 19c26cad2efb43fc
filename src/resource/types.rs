//! Resource and operation definitions

use crate::error::{Error, Result};
use crate::pagination::PaginationConfig;
use crate::schema::SchemaRegistry;
use crate::template;
use crate::types::Method;
use serde::Deserialize;
use std::collections::BTreeMap;

// ============================================================================
// Operation Definition
// ============================================================================

/// One remote operation: a method, a path template, and the models its
/// request and response decode against.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationDef {
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// Path template with `{param}` placeholders, relative to the base URL
    pub path: String,
    /// Model a request body is encoded against
    #[serde(default)]
    pub request_model: Option<String>,
    /// Model the response decodes against
    #[serde(default)]
    pub response_model: Option<String>,
    /// Dot path to the payload inside an envelope body, e.g. `result`
    #[serde(default)]
    pub result_path: Option<String>,
    /// Dot path to the record array of a list response
    #[serde(default)]
    pub records_path: Option<String>,
    /// Pagination strategy for list-style operations
    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl OperationDef {
    /// Create an operation for the given method and path template
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            request_model: None,
            response_model: None,
            result_path: None,
            records_path: None,
            pagination: PaginationConfig::None,
        }
    }

    /// Set the request model
    #[must_use]
    pub fn request_model(mut self, model: impl Into<String>) -> Self {
        self.request_model = Some(model.into());
        self
    }

    /// Set the response model
    #[must_use]
    pub fn response_model(mut self, model: impl Into<String>) -> Self {
        self.response_model = Some(model.into());
        self
    }

    /// Set the result path
    #[must_use]
    pub fn result_path(mut self, path: impl Into<String>) -> Self {
        self.result_path = Some(path.into());
        self
    }

    /// Set the records path
    #[must_use]
    pub fn records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Set the pagination strategy
    #[must_use]
    pub fn pagination(mut self, config: PaginationConfig) -> Self {
        self.pagination = config;
        self
    }

    /// Placeholder names of the path template, in order of appearance
    pub fn path_params(&self) -> Vec<String> {
        template::extract_params(&self.path)
    }
}

// ============================================================================
// Resource Definition
// ============================================================================

/// One remote resource: a named set of operations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceDef {
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Operations keyed by name (`get`, `list`, `create`, ...)
    #[serde(default)]
    pub operations: BTreeMap<String, OperationDef>,
}

impl ResourceDef {
    /// Create an empty definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation
    #[must_use]
    pub fn operation(mut self, name: impl Into<String>, op: OperationDef) -> Self {
        self.operations.insert(name.into(), op);
        self
    }

    /// Look up an operation by name
    pub fn get_operation(&self, name: &str) -> Option<&OperationDef> {
        self.operations.get(name)
    }

    /// Operation names, in map order
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }

    /// Check that every model this resource names is registered
    pub fn validate(&self, resource: &str, registry: &SchemaRegistry) -> Result<()> {
        for (name, op) in &self.operations {
            if op.path.is_empty() {
                return Err(Error::invalid_field(
                    format!("{resource}.{name}.path"),
                    "must not be empty",
                ));
            }
            for model in [&op.request_model, &op.response_model]
                .into_iter()
                .flatten()
            {
                if registry.get(model).is_none() {
                    return Err(Error::invalid_field(
                        format!("{resource}.{name}"),
                        format!("references unknown model '{model}'"),
                    ));
                }
            }
        }
        Ok(())
    }
}
