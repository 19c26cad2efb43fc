//! Tests for the transport module

use super::*;
use crate::options::{merge, DefaultOptions, RequestOptions};
use crate::types::{BackoffType, Method};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn effective(overrides: RequestOptions) -> crate::options::EffectiveOptions {
    merge(&DefaultOptions::default(), &overrides)
}

#[test]
fn test_transport_config_default() {
    let config = TransportConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("wireclient/"));
}

#[test]
fn test_transport_config_builder() {
    let config = TransportConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .user_agent("test-agent/1.0")
        .no_rate_limit()
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert!(config.rate_limit.is_none());
}

#[test]
fn test_build_url() {
    let config = TransportConfig::builder()
        .base_url("https://api.example.com/")
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();

    assert_eq!(
        transport.build_url("/zones/abc"),
        "https://api.example.com/zones/abc"
    );
    assert_eq!(
        transport.build_url("zones/abc"),
        "https://api.example.com/zones/abc"
    );
    // Absolute URLs pass through untouched (next-url pagination)
    assert_eq!(
        transport.build_url("https://other.example.com/p?cursor=x"),
        "https://other.example.com/p?cursor=x"
    );
}

#[tokio::test]
async fn test_execute_get_with_options() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "test"))
        .and(header("X-Request-Id", "req-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": []
        })))
        .mount(&mock_server)
        .await;

    let config = TransportConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();

    let opts = effective(
        RequestOptions::new()
            .query("q", "test")
            .header("X-Request-Id", "req-1"),
    );
    let response = transport.execute(Method::GET, "/search", &opts).await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_execute_post_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(wiremock::matchers::body_json(
            serde_json::json!({"name": "test"}),
        ))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let config = TransportConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();

    let opts = effective(RequestOptions::new().json(serde_json::json!({"name": "test"})));
    let response = transport.execute(Method::POST, "/items", &opts).await.unwrap();

    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_error_status_returned_not_raised() {
    // Status classification belongs to the resource layer; the transport
    // hands back whatever response it got.
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let config = TransportConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();

    let response = transport
        .execute(Method::GET, "/missing", &effective(RequestOptions::new()))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = TransportConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();

    let opts = effective(RequestOptions::new().timeout(Duration::from_millis(50)));
    let err = transport.execute(Method::GET, "/slow", &opts).await.unwrap_err();

    assert!(matches!(err, crate::error::Error::Timeout { timeout_ms: 50 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connect_fault_maps_to_transport_error() {
    let config = TransportConfig::builder()
        .base_url("http://127.0.0.1:1") // nothing listens here
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();

    let err = transport
        .execute(Method::GET, "/x", &effective(RequestOptions::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, crate::error::Error::Transport(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_retry_on_500_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let config = TransportConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();
    let policy = RetryPolicy::new(
        BackoffType::Constant,
        Duration::from_millis(10),
        Duration::from_secs(1),
    );

    let opts = effective(RequestOptions::new().retries(3));
    let response = execute_with_retry(&transport, &policy, Method::GET, "/flaky", &opts)
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_retries_exhausted_returns_last_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/always-fail"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = TransportConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();
    let policy = RetryPolicy::new(
        BackoffType::Constant,
        Duration::from_millis(10),
        Duration::from_secs(1),
    );

    let opts = effective(RequestOptions::new().retries(2));
    let response = execute_with_retry(&transport, &policy, Method::GET, "/always-fail", &opts)
        .await
        .unwrap();

    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn test_zero_retries_single_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/once"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TransportConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();

    let opts = effective(RequestOptions::new().retries(0));
    let response = execute_with_retry(
        &transport,
        &RetryPolicy::default(),
        Method::GET,
        "/once",
        &opts,
    )
    .await
    .unwrap();

    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_retry_honors_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "0")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = TransportConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let transport = Transport::with_config(config).unwrap();

    let opts = effective(RequestOptions::new().retries(2));
    let response = execute_with_retry(
        &transport,
        &RetryPolicy::default(),
        Method::GET,
        "/limited",
        &opts,
    )
    .await
    .unwrap();

    assert_eq!(response.status(), 200);
}

#[test]
fn test_backoff_constant() {
    let policy = RetryPolicy::new(
        BackoffType::Constant,
        Duration::from_millis(100),
        Duration::from_secs(10),
    );
    assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
    assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(100));
}

#[test]
fn test_backoff_linear() {
    let policy = RetryPolicy::new(
        BackoffType::Linear,
        Duration::from_millis(100),
        Duration::from_secs(10),
    );
    assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
    assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
    assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(300));
}

#[test]
fn test_backoff_exponential() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
    assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
    assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
    assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(800));
}

#[test]
fn test_backoff_respects_max() {
    let policy = RetryPolicy::new(
        BackoffType::Exponential,
        Duration::from_millis(100),
        Duration::from_millis(500),
    );
    assert_eq!(policy.delay_for_attempt(10), Duration::from_millis(500));
}

#[test]
fn test_backoff_large_attempt_does_not_overflow() {
    let policy = RetryPolicy::new(
        BackoffType::Exponential,
        Duration::from_secs(60),
        Duration::from_secs(120),
    );
    assert_eq!(policy.delay_for_attempt(32), Duration::from_secs(120));
    assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(120));

    let linear = RetryPolicy::new(
        BackoffType::Linear,
        Duration::from_secs(60),
        Duration::from_secs(120),
    );
    assert_eq!(linear.delay_for_attempt(u32::MAX), Duration::from_secs(120));
}

#[test]
fn test_transport_debug() {
    let transport = Transport::new().unwrap();
    let debug_str = format!("{transport:?}");
    assert!(debug_str.contains("Transport"));
    assert!(debug_str.contains("config"));
}
