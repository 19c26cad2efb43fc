//! Schema type definitions
//!
//! These types are deserializable from YAML client definitions and
//! constructible in code for hand-built clients.

use crate::types::UnknownFields;
use serde::{Deserialize, Serialize};

// ============================================================================
// Field Types
// ============================================================================

/// Scalar wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
}

/// Type of a model field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    /// A scalar: `string`, `integer`, `number`, `boolean`
    Scalar(ScalarType),
    /// Reference to a named model, enum, or oneOf: `{ ref: Account }`
    Ref {
        /// Target type name, resolved through the registry at decode time
        #[serde(rename = "ref")]
        target: String,
    },
    /// Homogeneous list: `{ list: string }` or `{ list: { ref: Zone } }`
    List {
        /// Element type
        list: Box<FieldType>,
    },
}

impl FieldType {
    /// Shorthand for a reference type
    pub fn reference(target: impl Into<String>) -> Self {
        Self::Ref {
            target: target.into(),
        }
    }

    /// Shorthand for a list type
    pub fn list(element: FieldType) -> Self {
        Self::List {
            list: Box::new(element),
        }
    }

    /// Collect all type names this field type refers to
    pub fn referenced_types(&self) -> Vec<&str> {
        match self {
            Self::Scalar(_) => Vec::new(),
            Self::Ref { target } => vec![target.as_str()],
            Self::List { list } => list.referenced_types(),
        }
    }
}

// ============================================================================
// Field Definition
// ============================================================================

/// One named, typed field of a model.
///
/// The attribute-to-wire-name mapping is fixed here, at definition time;
/// decoding never consults a runtime lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name in the decoded model
    pub name: String,
    /// Wire key, when it differs from `name` (e.g. camelCase)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_name: Option<String>,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Required fields must be present and non-null post-deserialization
    #[serde(default)]
    pub required: bool,
}

impl FieldDef {
    /// Create an optional field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            wire_name: None,
            field_type,
            required: false,
        }
    }

    /// Mark this field required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set a wire key differing from the field name
    #[must_use]
    pub fn wire(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = Some(wire_name.into());
        self
    }

    /// The key used on the wire for this field
    pub fn wire_key(&self) -> &str {
        self.wire_name.as_deref().unwrap_or(&self.name)
    }
}

// ============================================================================
// Model Schema
// ============================================================================

/// A named model: a fixed set of named, typed fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Type name (filled from the map key when loaded from YAML)
    #[serde(default)]
    pub name: String,
    /// Declared fields
    pub fields: Vec<FieldDef>,
    /// What to do with undeclared wire fields
    #[serde(default)]
    pub unknown_fields: UnknownFields,
}

impl ModelSchema {
    /// Create an empty model schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            unknown_fields: UnknownFields::default(),
        }
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the unknown-field policy
    #[must_use]
    pub fn unknown(mut self, policy: UnknownFields) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Find a field by model-space name
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// ============================================================================
// Enum Schema
// ============================================================================

/// A closed string enumeration.
///
/// Unknown wire values decode to the `unrecognized` sentinel instead of
/// failing, preserving forward compatibility with server-added values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumSchema {
    /// Type name
    #[serde(default)]
    pub name: String,
    /// Allowed wire values
    pub values: Vec<String>,
}

impl EnumSchema {
    /// Create an enum schema from its allowed values
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    /// Check if a wire value is one of the declared values
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

// ============================================================================
// OneOf Schema
// ============================================================================

/// A composed schema: candidates are tried in declared order and the
/// first that decodes without error is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOfSchema {
    /// Type name
    #[serde(default)]
    pub name: String,
    /// Candidate type names, tried in order
    pub candidates: Vec<String>,
}

impl OneOfSchema {
    /// Create a oneOf schema from its candidates
    pub fn new(name: impl Into<String>, candidates: &[&str]) -> Self {
        Self {
            name: name.into(),
            candidates: candidates.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Any registrable type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Named model
    Model(ModelSchema),
    /// Closed string enum
    Enum(EnumSchema),
    /// Ordered oneOf composition
    OneOf(OneOfSchema),
}

impl Schema {
    /// The type name this schema registers under
    pub fn name(&self) -> &str {
        match self {
            Self::Model(m) => &m.name,
            Self::Enum(e) => &e.name,
            Self::OneOf(o) => &o.name,
        }
    }

    /// All type names this schema refers to
    pub fn referenced_types(&self) -> Vec<&str> {
        match self {
            Self::Model(m) => m
                .fields
                .iter()
                .flat_map(|f| f.field_type.referenced_types())
                .collect(),
            Self::Enum(_) => Vec::new(),
            Self::OneOf(o) => o.candidates.iter().map(String::as_str).collect(),
        }
    }
}

impl From<ModelSchema> for Schema {
    fn from(m: ModelSchema) -> Self {
        Self::Model(m)
    }
}

impl From<EnumSchema> for Schema {
    fn from(e: EnumSchema) -> Self {
        Self::Enum(e)
    }
}

impl From<OneOfSchema> for Schema {
    fn from(o: OneOfSchema) -> Self {
        Self::OneOf(o)
    }
}
