//! Schema registry
//!
//! An arena of schemas keyed by type name, populated once at client
//! construction. Nested model references are looked up by name at decode
//! time, which tolerates forward declarations and cycles between types
//! defined far apart in a definition file.

use super::types::Schema;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Registry of named schemas for one client
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its own name
    pub fn register(&mut self, schema: impl Into<Schema>) -> Result<()> {
        let schema = schema.into();
        let name = schema.name().to_string();

        if name.is_empty() {
            return Err(Error::config("schema has no type name"));
        }
        if self.types.contains_key(&name) {
            return Err(Error::DuplicateType { name });
        }

        self.types.insert(name, schema);
        Ok(())
    }

    /// Look up a schema by name
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.types.get(name)
    }

    /// Look up a schema by name, failing with an unknown-type error
    pub fn resolve(&self, name: &str) -> Result<&Schema> {
        self.types
            .get(name)
            .ok_or_else(|| Error::unknown_type(name))
    }

    /// Check that every reference inside every registered schema resolves.
    ///
    /// Run once after registration; decode paths can then assume that a
    /// dangling reference is a bug, not bad input.
    pub fn validate_references(&self) -> Result<()> {
        for schema in self.types.values() {
            for target in schema.referenced_types() {
                if !self.types.contains_key(target) {
                    return Err(Error::invalid_field(
                        schema.name(),
                        format!("references unknown type '{target}'"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Sorted list of registered type names
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
