//! Tests for the response module

use super::*;
use crate::schema::{FieldDef, FieldType, ModelSchema, ScalarType, SchemaRegistry};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry() -> Arc<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry
        .register(
            ModelSchema::new("Zone")
                .field(FieldDef::new("id", FieldType::Scalar(ScalarType::String)).required())
                .field(FieldDef::new("name", FieldType::Scalar(ScalarType::String))),
        )
        .unwrap();
    Arc::new(registry)
}

fn raw(body: &str, model: Option<&str>) -> RawResponse {
    raw_with_result_path(body, model, None)
}

fn raw_with_result_path(
    body: &str,
    model: Option<&str>,
    result_path: Option<&str>,
) -> RawResponse {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    RawResponse::new(
        StatusCode::OK,
        headers,
        Bytes::copy_from_slice(body.as_bytes()),
        registry(),
        model.map(String::from),
        result_path.map(String::from),
    )
}

#[test]
fn test_raw_accessors() {
    let response = raw(r#"{"id":"z1","name":"example.com"}"#, Some("Zone"));

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(response.text(), r#"{"id":"z1","name":"example.com"}"#);
    assert_eq!(
        response.json().unwrap(),
        json!({"id": "z1", "name": "example.com"})
    );
}

#[test]
fn test_raw_lazy_parse() {
    let response = raw(r#"{"id":"z1","name":"example.com"}"#, Some("Zone"));

    let model = response.parse().unwrap();
    assert_eq!(model.schema(), "Zone");
    assert_eq!(model.get_str("id"), Some("z1"));

    // Parse is repeatable; the raw body is untouched
    assert!(response.parse().is_ok());
}

#[test]
fn test_raw_parse_applies_result_path() {
    let response = raw_with_result_path(
        r#"{"success":true,"result":{"id":"z1","name":"example.com"}}"#,
        Some("Zone"),
        Some("result"),
    );

    let model = response.parse().unwrap();
    assert_eq!(model.get_str("id"), Some("z1"));
    assert_eq!(model.get_str("name"), Some("example.com"));
}

#[test]
fn test_raw_parse_result_path_missing() {
    let response = raw_with_result_path(r#"{"success":true}"#, Some("Zone"), Some("result"));
    let err = response.parse().unwrap_err();
    assert!(err.to_string().contains("result"));
}

#[test]
fn test_raw_parse_without_model() {
    let response = raw(r#"{"id":"z1"}"#, None);
    assert!(response.parse().is_err());
}

#[test]
fn test_raw_parse_schema_mismatch() {
    let response = raw(r#"{"name":"no id here"}"#, Some("Zone"));
    let err = response.parse().unwrap_err();
    assert!(err.to_string().contains("$.id"));
}

async fn streaming_fixture(body: &str, model: Option<&str>) -> (MockServer, StreamingResponse) {
    streaming_fixture_with_result_path(body, model, None).await
}

async fn streaming_fixture_with_result_path(
    body: &str,
    model: Option<&str>,
    result_path: Option<&str>,
) -> (MockServer, StreamingResponse) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"))
        .mount(&server)
        .await;

    let response = reqwest::Client::new()
        .get(format!("{}/stream", server.uri()))
        .send()
        .await
        .unwrap();
    let streaming = StreamingResponse::new(
        response,
        registry(),
        model.map(String::from),
        result_path.map(String::from),
    );
    (server, streaming)
}

#[tokio::test]
async fn test_streaming_drain_sets_close_signal() {
    let (_server, mut streaming) = streaming_fixture(r#"{"id":"z1"}"#, None).await;
    let signal = streaming.close_signal();
    assert!(!signal.is_closed());

    let mut collected = Vec::new();
    while let Some(chunk) = streaming.chunk().await.unwrap() {
        collected.extend_from_slice(&chunk);
    }

    assert_eq!(collected, br#"{"id":"z1"}"#);
    assert!(signal.is_closed());
}

#[tokio::test]
async fn test_streaming_early_drop_sets_close_signal() {
    let (_server, mut streaming) = streaming_fixture(r#"{"id":"z1"}"#, None).await;
    let signal = streaming.close_signal();

    // Take at most one chunk, then abandon the stream
    let _ = streaming.chunk().await.unwrap();
    drop(streaming);

    assert!(signal.is_closed());
}

#[tokio::test]
async fn test_streaming_collect() {
    let (_server, streaming) = streaming_fixture(r#"{"id":"z1"}"#, None).await;
    let signal = streaming.close_signal();

    let body = streaming.collect().await.unwrap();
    assert_eq!(&body[..], br#"{"id":"z1"}"#);
    assert!(signal.is_closed());
}

#[tokio::test]
async fn test_streaming_collect_parse() {
    let (_server, streaming) =
        streaming_fixture(r#"{"id":"z1","name":"example.com"}"#, Some("Zone")).await;

    let model = streaming.collect_parse().await.unwrap();
    assert_eq!(model.get_str("id"), Some("z1"));
    assert_eq!(model.get_str("name"), Some("example.com"));
}

#[tokio::test]
async fn test_streaming_collect_parse_applies_result_path() {
    let (_server, streaming) = streaming_fixture_with_result_path(
        r#"{"success":true,"result":{"id":"z1","name":"example.com"}}"#,
        Some("Zone"),
        Some("result"),
    )
    .await;

    let model = streaming.collect_parse().await.unwrap();
    assert_eq!(model.get_str("id"), Some("z1"));
    assert_eq!(model.get_str("name"), Some("example.com"));
}

#[tokio::test]
async fn test_streaming_collect_parse_without_model() {
    let (_server, streaming) = streaming_fixture(r#"{"id":"z1"}"#, None).await;
    assert!(streaming.collect_parse().await.is_err());
}

#[tokio::test]
async fn test_streaming_status_and_headers() {
    let (_server, streaming) = streaming_fixture(r#"{}"#, None).await;
    assert_eq!(streaming.status(), StatusCode::OK);
    assert_eq!(
        streaming.headers().get("content-type").unwrap(),
        "application/json"
    );
}
