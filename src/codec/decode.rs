//! Wire-to-model decoding

use super::UNRECOGNIZED;
use crate::error::{Error, Result};
use crate::schema::{EnumSchema, FieldType, ModelSchema, OneOfSchema, ScalarType, Schema, SchemaRegistry};
use crate::types::{JsonObject, JsonValue, UnknownFields};

/// Decode a wire value against a named type
pub(super) fn decode_value(
    registry: &SchemaRegistry,
    type_name: &str,
    wire: &JsonValue,
    path: &str,
) -> Result<JsonValue> {
    match registry.resolve(type_name)? {
        Schema::Model(model) => decode_model(registry, model, wire, path),
        Schema::Enum(e) => decode_enum(e, wire, path),
        Schema::OneOf(o) => decode_one_of(registry, o, wire, path),
    }
}

/// Decode an object against a model schema
fn decode_model(
    registry: &SchemaRegistry,
    model: &ModelSchema,
    wire: &JsonValue,
    path: &str,
) -> Result<JsonValue> {
    let obj = wire.as_object().ok_or_else(|| {
        Error::decode(path, format!("expected object for model '{}'", model.name))
    })?;

    let mut out = JsonObject::new();

    for field in &model.fields {
        let field_path = format!("{path}.{}", field.name);
        match obj.get(field.wire_key()) {
            Some(JsonValue::Null) | None => {
                if field.required {
                    return Err(Error::decode(
                        field_path,
                        format!("missing required field '{}'", field.wire_key()),
                    ));
                }
                // Optional and absent/null: left unset in the model
            }
            Some(value) => {
                let decoded = decode_field(registry, &field.field_type, value, &field_path)?;
                out.insert(field.name.clone(), decoded);
            }
        }
    }

    if model.unknown_fields == UnknownFields::Preserve {
        let declared: Vec<&str> = model.fields.iter().map(|f| f.wire_key()).collect();
        for (key, value) in obj {
            // Never let an undeclared wire key shadow a decoded field
            if !declared.contains(&key.as_str()) && !out.contains_key(key) {
                out.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(JsonValue::Object(out))
}

/// Decode a single field value against its declared type
fn decode_field(
    registry: &SchemaRegistry,
    field_type: &FieldType,
    wire: &JsonValue,
    path: &str,
) -> Result<JsonValue> {
    match field_type {
        FieldType::Scalar(scalar) => decode_scalar(*scalar, wire, path),
        FieldType::Ref { target } => decode_value(registry, target, wire, path),
        FieldType::List { list } => {
            let items = wire
                .as_array()
                .ok_or_else(|| Error::decode(path, "expected array"))?;
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                out.push(decode_field(registry, list, item, &format!("{path}[{i}]"))?);
            }
            Ok(JsonValue::Array(out))
        }
    }
}

/// Decode a scalar, rejecting type mismatches
fn decode_scalar(scalar: ScalarType, wire: &JsonValue, path: &str) -> Result<JsonValue> {
    match scalar {
        ScalarType::String => match wire {
            JsonValue::String(_) => Ok(wire.clone()),
            other => Err(type_mismatch(path, "string", other)),
        },
        ScalarType::Integer => match wire.as_i64() {
            Some(n) => Ok(JsonValue::from(n)),
            None => Err(type_mismatch(path, "integer", wire)),
        },
        ScalarType::Number => match wire.as_f64() {
            Some(_) => Ok(wire.clone()),
            None => Err(type_mismatch(path, "number", wire)),
        },
        ScalarType::Boolean => match wire {
            JsonValue::Bool(_) => Ok(wire.clone()),
            other => Err(type_mismatch(path, "boolean", other)),
        },
    }
}

/// Decode a closed enum; unknown values become the sentinel
fn decode_enum(schema: &EnumSchema, wire: &JsonValue, path: &str) -> Result<JsonValue> {
    let value = wire
        .as_str()
        .ok_or_else(|| type_mismatch(path, "enum string", wire))?;

    if schema.contains(value) {
        Ok(wire.clone())
    } else {
        Ok(JsonValue::String(UNRECOGNIZED.to_string()))
    }
}

/// Try oneOf candidates in declared order; first success wins
fn decode_one_of(
    registry: &SchemaRegistry,
    schema: &OneOfSchema,
    wire: &JsonValue,
    path: &str,
) -> Result<JsonValue> {
    for candidate in &schema.candidates {
        if let Ok(decoded) = decode_value(registry, candidate, wire, path) {
            return Ok(decoded);
        }
    }

    Err(Error::decode(
        path,
        format!(
            "no oneOf candidate of '{}' matched (tried: {})",
            schema.name,
            schema.candidates.join(", ")
        ),
    ))
}

fn type_mismatch(path: &str, expected: &str, got: &JsonValue) -> Error {
    Error::decode(path, format!("expected {expected}, got {}", kind_of(got)))
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
