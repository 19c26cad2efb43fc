//! Integration tests using a mock HTTP server
//!
//! Tests the full end-to-end flow: YAML definition or hand-built client →
//! HTTP requests → typed models.

use serde_json::json;
use std::time::Duration;
use wireclient::auth::{AuthScheme, Location};
use wireclient::pagination::PaginationConfig;
use wireclient::schema::{EnumSchema, FieldDef, FieldType, ModelSchema, ScalarType};
use wireclient::transport::RetryPolicy;
use wireclient::types::{BackoffType, Method};
use wireclient::{
    ApiClient, Error, OperationDef, RequestOptions, ResourceDef, StatusKind,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn zone_schema() -> ModelSchema {
    ModelSchema::new("Zone")
        .field(FieldDef::new("id", FieldType::Scalar(ScalarType::String)).required())
        .field(FieldDef::new("name", FieldType::Scalar(ScalarType::String)))
        .field(
            FieldDef::new("zone_type", FieldType::reference("ZoneType")).wire("type"),
        )
}

fn zones_client(base_url: &str) -> ApiClient {
    ApiClient::builder()
        .base_url(base_url)
        .no_rate_limit()
        .schema(zone_schema())
        .schema(EnumSchema::new("ZoneType", &["full", "partial"]))
        .resource(
            "zones",
            ResourceDef::new()
                .operation(
                    "get",
                    OperationDef::new(Method::GET, "/zones/{zone_id}")
                        .response_model("Zone")
                        .result_path("result"),
                )
                .operation(
                    "create",
                    OperationDef::new(Method::POST, "/zones")
                        .request_model("Zone")
                        .response_model("Zone")
                        .result_path("result"),
                )
                .operation(
                    "list",
                    OperationDef::new(Method::GET, "/zones")
                        .response_model("Zone")
                        .records_path("result")
                        .pagination(PaginationConfig::Cursor {
                            cursor_param: "cursor".to_string(),
                            cursor_path: "result_info.cursor".to_string(),
                            limit_param: "limit".to_string(),
                            page_size: Some(2),
                        }),
                ),
        )
        .build()
        .unwrap()
}

// ============================================================================
// Typed Operation Tests
// ============================================================================

#[tokio::test]
async fn test_get_decodes_typed_model() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"id": "abc123", "name": "example.com", "type": "full"}
        })))
        .mount(&server)
        .await;

    let client = zones_client(&server.uri());
    let zone = client
        .resource("zones")
        .unwrap()
        .get("abc123", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(zone.get_str("id"), Some("abc123"));
    assert_eq!(zone.get_str("name"), Some("example.com"));
    // Wire key `type` maps back to the model-space name
    assert_eq!(zone.get_str("zone_type"), Some("full"));
}

#[tokio::test]
async fn test_create_encodes_wire_names() {
    let server = MockServer::start().await;

    // The request body must carry wire names, not model names
    Mock::given(method("POST"))
        .and(path("/zones"))
        .and(body_json(json!({"id": "z1", "name": "new.example.com", "type": "partial"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"id": "z1", "name": "new.example.com", "type": "partial"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = zones_client(&server.uri());
    let zone = client
        .resource("zones")
        .unwrap()
        .create(
            RequestOptions::new()
                .json(json!({"id": "z1", "name": "new.example.com", "zone_type": "partial"})),
        )
        .await
        .unwrap();

    assert_eq!(zone.get_str("zone_type"), Some("partial"));
}

#[tokio::test]
async fn test_empty_path_param_rejected_before_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = zones_client(&server.uri());
    let err = client
        .resource("zones")
        .unwrap()
        .get("", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
}

// ============================================================================
// Retry and Error Taxonomy Tests
// ============================================================================

#[tokio::test]
async fn test_retry_on_500_then_success() {
    let server = MockServer::start().await;

    // First request fails, second succeeds
    Mock::given(method("GET"))
        .and(path("/zones/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/zones/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"id": "flaky"}
        })))
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .retry_policy(RetryPolicy::new(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(100),
        ))
        .schema(zone_schema())
        .schema(EnumSchema::new("ZoneType", &["full", "partial"]))
        .resource(
            "zones",
            ResourceDef::new().operation(
                "get",
                OperationDef::new(Method::GET, "/zones/{zone_id}")
                    .response_model("Zone")
                    .result_path("result"),
            ),
        )
        .build()
        .unwrap();

    let zone = client
        .resource("zones")
        .unwrap()
        .get("flaky", RequestOptions::new().retries(3))
        .await
        .unwrap();

    assert_eq!(zone.get_str("id"), Some("flaky"));
}

#[tokio::test]
async fn test_not_found_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 7003, "message": "no such zone"
        })))
        .mount(&server)
        .await;

    let client = zones_client(&server.uri());
    let err = client
        .resource("zones")
        .unwrap()
        .get("missing", RequestOptions::new().retries(0))
        .await
        .unwrap_err();

    match err {
        Error::Status(e) => {
            assert_eq!(e.kind, StatusKind::NotFound);
            assert_eq!(e.status, 404);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

// ============================================================================
// Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_cursor_pagination_walk() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"id": "z3"}, {"id": "z4"}],
            "result_info": {"cursor": "c2"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"id": "z5"}],
            "result_info": {}
        })))
        .mount(&server)
        .await;

    // No cursor param on the first request
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"id": "z1"}, {"id": "z2"}],
            "result_info": {"cursor": "c1"}
        })))
        .mount(&server)
        .await;

    let client = zones_client(&server.uri());
    let page = client
        .resource("zones")
        .unwrap()
        .list(RequestOptions::new())
        .await
        .unwrap();

    let all = page.collect_all().await.unwrap();
    let ids: Vec<_> = all.iter().filter_map(|m| m.get_str("id")).collect();
    assert_eq!(ids, vec!["z1", "z2", "z3", "z4", "z5"]);
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_api_key_header_applied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones/abc123"))
        .and(header("X-Auth-Key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"id": "abc123"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .auth(AuthScheme::ApiKey {
            location: Location::Header,
            name: "X-Auth-Key".to_string(),
            prefix: None,
            value: "secret-key".to_string(),
        })
        .schema(zone_schema())
        .schema(EnumSchema::new("ZoneType", &["full", "partial"]))
        .resource(
            "zones",
            ResourceDef::new().operation(
                "get",
                OperationDef::new(Method::GET, "/zones/{zone_id}")
                    .response_model("Zone")
                    .result_path("result"),
            ),
        )
        .build()
        .unwrap();

    let zone = client
        .resource("zones")
        .unwrap()
        .get("abc123", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(zone.get_str("id"), Some("abc123"));
}
