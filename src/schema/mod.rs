//! Typed model schemas
//!
//! Declarative descriptions of wire payloads: models with named, typed
//! fields and static field-to-wire-name tables, closed string enums, and
//! oneOf compositions. Schemas live in a [`SchemaRegistry`] keyed by type
//! name; nested references are resolved by name at decode time, so forward
//! and circular type graphs are fine.

mod registry;
mod types;


pub use registry::SchemaRegistry;
pub use types::{EnumSchema, FieldDef, FieldType, ModelSchema, OneOfSchema, ScalarType, Schema};
