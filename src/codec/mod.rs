//! Typed model (de)serialization
//!
//! Converts between wire JSON and [`TypedModel`] values against schemas in
//! a [`SchemaRegistry`](crate::schema::SchemaRegistry). Required fields are
//! enforced, nested references resolve lazily through the registry, closed
//! enums map unknown wire values to the [`UNRECOGNIZED`] sentinel, and
//! oneOf compositions accept the first candidate that decodes.

mod decode;
mod encode;


use crate::error::Result;
use crate::schema::SchemaRegistry;
use crate::types::{JsonObject, JsonValue};

/// Sentinel value an unknown enum wire string decodes to
pub const UNRECOGNIZED: &str = "unrecognized";

/// Root path for decode error reporting
const ROOT: &str = "$";

/// An immutable typed view of a decoded payload
#[derive(Debug, Clone, PartialEq)]
pub struct TypedModel {
    schema: String,
    data: JsonValue,
}

impl TypedModel {
    /// Construct a model from already-canonical data.
    ///
    /// Used by the decoder and by callers building request bodies; the
    /// data is validated when encoded.
    pub fn new(schema: impl Into<String>, data: JsonValue) -> Self {
        Self {
            schema: schema.into(),
            data,
        }
    }

    /// The schema name this model was decoded against
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The canonical data
    pub fn data(&self) -> &JsonValue {
        &self.data
    }

    /// Consume the model, returning the canonical data
    pub fn into_inner(self) -> JsonValue {
        self.data
    }

    /// Get a field by model-space name
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.data.get(name)
    }

    /// Get a string field
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(JsonValue::as_str)
    }

    /// Get an integer field
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(JsonValue::as_i64)
    }

    /// Get a number field
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(JsonValue::as_f64)
    }

    /// Get a boolean field
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(JsonValue::as_bool)
    }

    /// Get a list field
    pub fn get_list(&self, name: &str) -> Option<&Vec<JsonValue>> {
        self.get(name).and_then(JsonValue::as_array)
    }

    /// Get a nested object field
    pub fn get_object(&self, name: &str) -> Option<&JsonObject> {
        self.get(name).and_then(JsonValue::as_object)
    }
}

/// Decode a wire value into a typed model
pub fn decode(registry: &SchemaRegistry, type_name: &str, wire: &JsonValue) -> Result<TypedModel> {
    let data = decode::decode_value(registry, type_name, wire, ROOT)?;
    Ok(TypedModel::new(type_name, data))
}

/// Decode wire bytes into a typed model
pub fn decode_bytes(registry: &SchemaRegistry, type_name: &str, bytes: &[u8]) -> Result<TypedModel> {
    let wire: JsonValue = serde_json::from_slice(bytes)?;
    decode(registry, type_name, &wire)
}

/// Encode a typed model back into its wire representation
pub fn encode(registry: &SchemaRegistry, model: &TypedModel) -> Result<JsonValue> {
    encode::encode_value(registry, model.schema(), model.data(), ROOT)
}
