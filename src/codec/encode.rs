//! Model-to-wire encoding
//!
//! The mirror of decoding: model-space field names map back to their wire
//! keys, unset optional fields are omitted, and unknown preserved fields
//! pass through verbatim.

use super::UNRECOGNIZED;
use crate::error::{Error, Result};
use crate::schema::{EnumSchema, FieldType, ModelSchema, OneOfSchema, ScalarType, Schema, SchemaRegistry};
use crate::types::{JsonObject, JsonValue, UnknownFields};

/// Encode canonical model data against a named type
pub(super) fn encode_value(
    registry: &SchemaRegistry,
    type_name: &str,
    data: &JsonValue,
    path: &str,
) -> Result<JsonValue> {
    match registry.resolve(type_name)? {
        Schema::Model(model) => encode_model(registry, model, data, path),
        Schema::Enum(e) => encode_enum(e, data, path),
        Schema::OneOf(o) => encode_one_of(registry, o, data, path),
    }
}

fn encode_model(
    registry: &SchemaRegistry,
    model: &ModelSchema,
    data: &JsonValue,
    path: &str,
) -> Result<JsonValue> {
    let obj = data.as_object().ok_or_else(|| {
        Error::decode(path, format!("expected object for model '{}'", model.name))
    })?;

    let mut out = JsonObject::new();

    for field in &model.fields {
        let field_path = format!("{path}.{}", field.name);
        match obj.get(&field.name) {
            Some(JsonValue::Null) | None => {
                if field.required {
                    return Err(Error::decode(
                        field_path,
                        format!("missing required field '{}'", field.name),
                    ));
                }
            }
            Some(value) => {
                let encoded = encode_field(registry, &field.field_type, value, &field_path)?;
                out.insert(field.wire_key().to_string(), encoded);
            }
        }
    }

    if model.unknown_fields == UnknownFields::Preserve {
        let declared: Vec<&str> = model.fields.iter().map(|f| f.name.as_str()).collect();
        for (key, value) in obj {
            if !declared.contains(&key.as_str()) && !out.contains_key(key) {
                out.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(JsonValue::Object(out))
}

fn encode_field(
    registry: &SchemaRegistry,
    field_type: &FieldType,
    data: &JsonValue,
    path: &str,
) -> Result<JsonValue> {
    match field_type {
        FieldType::Scalar(scalar) => encode_scalar(*scalar, data, path),
        FieldType::Ref { target } => encode_value(registry, target, data, path),
        FieldType::List { list } => {
            let items = data
                .as_array()
                .ok_or_else(|| Error::decode(path, "expected array"))?;
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                out.push(encode_field(registry, list, item, &format!("{path}[{i}]"))?);
            }
            Ok(JsonValue::Array(out))
        }
    }
}

fn encode_scalar(scalar: ScalarType, data: &JsonValue, path: &str) -> Result<JsonValue> {
    let ok = match scalar {
        ScalarType::String => data.is_string(),
        ScalarType::Integer => data.as_i64().is_some(),
        ScalarType::Number => data.as_f64().is_some(),
        ScalarType::Boolean => data.is_boolean(),
    };

    if ok {
        Ok(data.clone())
    } else {
        Err(Error::decode(path, "scalar value does not match field type"))
    }
}

/// Encode an enum value. The unrecognized sentinel has no wire
/// representation and is rejected rather than invented.
fn encode_enum(schema: &EnumSchema, data: &JsonValue, path: &str) -> Result<JsonValue> {
    let value = data
        .as_str()
        .ok_or_else(|| Error::decode(path, "expected enum string"))?;

    if value == UNRECOGNIZED {
        return Err(Error::decode(
            path,
            format!("cannot encode unrecognized value of enum '{}'", schema.name),
        ));
    }
    if !schema.contains(value) {
        return Err(Error::decode(
            path,
            format!("'{value}' is not a value of enum '{}'", schema.name),
        ));
    }

    Ok(data.clone())
}

fn encode_one_of(
    registry: &SchemaRegistry,
    schema: &OneOfSchema,
    data: &JsonValue,
    path: &str,
) -> Result<JsonValue> {
    for candidate in &schema.candidates {
        if let Ok(encoded) = encode_value(registry, candidate, data, path) {
            return Ok(encoded);
        }
    }

    Err(Error::decode(
        path,
        format!("no oneOf candidate of '{}' accepted the value", schema.name),
    ))
}
