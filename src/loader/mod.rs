//! Declarative client definitions
//!
//! A client can be described in a YAML document: base URL, auth, HTTP
//! tuning, type schemas and resources with their operations. The loader
//! parses and validates the document and resolves it into an
//! [`ApiClient`](crate::client::ApiClient).

mod parser;
mod types;


pub use parser::{build_client, expand_env, load_client, load_definition, load_definition_from_str};
pub use types::{
    AuthDefinition, BackoffDefinition, ClientDefinition, HttpDefinition, RateLimitDefinition,
    SchemaDefinition,
};
