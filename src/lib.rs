// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]

//! # wireclient
//!
//! A minimal, Rust-native runtime for typed HTTP API clients.
//! Describe an API once - base URL, auth, schemas, resources - and get a
//! typed client with retry, rate limiting and pagination for free.
//!
//! ## Features
//!
//! - **Declarative clients**: Define an entire API client in YAML
//! - **Typed models**: Schema-checked decoding with wire-name mapping
//! - **Multiple auth types**: API key, bearer, basic, OAuth2, JWT
//! - **Smart pagination**: Cursor, offset, page number, link header
//! - **Response variants**: Parsed models, raw bytes, or streamed chunks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wireclient::{load_client, RequestOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load a client from YAML
//!     let client = load_client("clients/dns.yaml")?;
//!
//!     // Fetch one typed record
//!     let zones = client.resource("zones")?;
//!     let zone = zones.get("abc123", RequestOptions::new()).await?;
//!     println!("{:?}", zone.get_str("name"));
//!
//!     // Walk a paginated listing
//!     let mut page = zones.list(RequestOptions::new()).await?;
//!     let all = page.collect_all().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Resource Façade                          │
//! │  get/create/update/delete → TypedModel    list → Page           │
//! │  raw() → RawResponse      streaming() → StreamingResponse       │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │ Transport │   Paginate    │   Codec   │   Loader    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ API Key  │ GET/POST  │ Cursor        │ Models    │ YAML        │
//! │ OAuth2   │ Retry     │ Offset        │ Enums     │ Env vars    │
//! │ JWT      │ Rate Limit│ Page Number   │ oneOf     │ Validation  │
//! │ Bearer   │ Backoff   │ Link Header   │ Registry  │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the runtime
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication schemes
pub mod auth;

/// HTTP transport with retry and rate limiting
pub mod transport;

/// Request option layering
pub mod options;

/// Type schemas and the registry
pub mod schema;

/// Typed model encoding and decoding
pub mod codec;

/// Pagination strategies and the page cursor
pub mod pagination;

/// Raw and streaming response variants
pub mod response;

/// Resource façades and operation definitions
pub mod resource;

/// Client assembly
pub mod client;

/// Declarative YAML client definitions
pub mod loader;

/// Path templates
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, StatusError, StatusKind};
pub use types::*;

// Re-export commonly used types
pub use client::{ApiClient, ApiClientBuilder};
pub use codec::{TypedModel, UNRECOGNIZED};
pub use loader::{load_client, load_definition, load_definition_from_str, ClientDefinition};
pub use options::{DefaultOptions, RequestOptions};
pub use pagination::Page;
pub use resource::{OperationDef, Resource, ResourceDef};
pub use response::{RawResponse, StreamingResponse};
pub use schema::{Schema, SchemaRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
