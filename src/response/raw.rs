//! Raw response wrapper

use crate::codec::{self, TypedModel};
use crate::error::{Error, Result};
use crate::pagination::extract_path;
use crate::schema::SchemaRegistry;
use crate::types::JsonValue;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::sync::Arc;

/// A fully buffered response left undecoded.
///
/// Decoding is deferred until [`parse`](Self::parse) is called, so callers
/// that only need the bytes or headers pay nothing for the typed layer.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    registry: Arc<SchemaRegistry>,
    model: Option<String>,
    result_path: Option<String>,
}

impl RawResponse {
    /// Wrap buffered response parts with the schema context needed for a
    /// later `parse`.
    pub(crate) fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        registry: Arc<SchemaRegistry>,
        model: Option<String>,
        result_path: Option<String>,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            registry,
            model,
            result_path,
        }
    }

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Undecoded body bytes
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text, lossy on invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body as untyped JSON
    pub fn json(&self) -> Result<JsonValue> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decode the body against the operation's response model, drilling
    /// through the operation's result path first so the outcome matches the
    /// parsed variant of the same call.
    pub fn parse(&self) -> Result<TypedModel> {
        let model = self
            .model
            .as_deref()
            .ok_or_else(|| Error::config("operation declares no response model"))?;

        let json: JsonValue = serde_json::from_slice(&self.body)?;
        let payload = match &self.result_path {
            Some(path) => extract_path(&json, path)
                .ok_or_else(|| Error::decode(path.clone(), "result path not found in response"))?,
            None => &json,
        };
        codec::decode(&self.registry, model, payload)
    }
}
