//! Tests for the auth module

use super::*;
use base64::Engine;
use std::collections::HashMap;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_cached_token_not_expired() {
    let token = CachedToken::expires_in("test".to_string(), 3600);
    assert!(!token.is_expired());
}

#[test]
fn test_cached_token_expired() {
    let token = CachedToken::expires_in("test".to_string(), -100);
    assert!(token.is_expired());
}

#[test]
fn test_cached_token_expiry_buffer() {
    // Tokens inside the 30s refresh buffer count as expired
    let token = CachedToken::expires_in("test".to_string(), 10);
    assert!(token.is_expired());
}

#[test]
fn test_cached_token_no_expiration() {
    let token = CachedToken::new("test".to_string(), None);
    assert!(!token.is_expired());
}

#[test]
fn test_auth_scheme_default() {
    assert!(matches!(AuthScheme::default(), AuthScheme::None));
    assert!(!AuthScheme::None.uses_token_cache());
}

#[test]
fn test_uses_token_cache() {
    let scheme = AuthScheme::OAuth2ClientCredentials {
        token_url: "https://auth.example.com/token".to_string(),
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        scopes: vec![],
        token_body: HashMap::new(),
    };
    assert!(scheme.uses_token_cache());

    let bearer = AuthScheme::Bearer {
        token: "t".to_string(),
    };
    assert!(!bearer.uses_token_cache());
}

#[tokio::test]
async fn test_api_key_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("X-API-Key", "secret123"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthScheme::ApiKey {
        location: Location::Header,
        name: "X-API-Key".to_string(),
        prefix: None,
        value: "secret123".to_string(),
    });

    let client = reqwest::Client::new();
    let req = client.get(format!("{}/data", mock_server.uri()));
    let req = auth.apply(req).await.unwrap();
    let response = req.send().await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_api_key_header_with_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Authorization", "Token secret123"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthScheme::ApiKey {
        location: Location::Header,
        name: "Authorization".to_string(),
        prefix: Some("Token ".to_string()),
        value: "secret123".to_string(),
    });

    let client = reqwest::Client::new();
    let req = client.get(format!("{}/data", mock_server.uri()));
    let response = auth.apply(req).await.unwrap().send().await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_api_key_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(query_param("api_key", "qk-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthScheme::ApiKey {
        location: Location::Query,
        name: "api_key".to_string(),
        prefix: None,
        value: "qk-1".to_string(),
    });

    let client = reqwest::Client::new();
    let req = client.get(format!("{}/data", mock_server.uri()));
    let response = auth.apply(req).await.unwrap().send().await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_basic_auth_header_encoding() {
    let mock_server = MockServer::start().await;

    let expected = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("alice:s3cret")
    );

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Authorization", expected.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthScheme::Basic {
        username: "alice".to_string(),
        password: "s3cret".to_string(),
    });

    let client = reqwest::Client::new();
    let req = client.get(format!("{}/data", mock_server.uri()));
    let response = auth.apply(req).await.unwrap().send().await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_bearer_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Authorization", "Bearer tok-42"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthScheme::Bearer {
        token: "tok-42".to_string(),
    });

    let client = reqwest::Client::new();
    let req = client.get(format!("{}/data", mock_server.uri()));
    let response = auth.apply(req).await.unwrap().send().await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_oauth2_client_credentials_fetches_and_caches() {
    let mock_server = MockServer::start().await;

    // Token endpoint must be hit exactly once across two applies
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=my-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "at-123",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Authorization", "Bearer at-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthScheme::OAuth2ClientCredentials {
        token_url: format!("{}/oauth/token", mock_server.uri()),
        client_id: "my-client".to_string(),
        client_secret: "my-secret".to_string(),
        scopes: vec!["read".to_string()],
        token_body: HashMap::new(),
    });

    let client = reqwest::Client::new();
    for _ in 0..2 {
        let req = client.get(format!("{}/data", mock_server.uri()));
        let response = auth.apply(req).await.unwrap().send().await.unwrap();
        assert_eq!(response.status(), 200);
    }
}

#[tokio::test]
async fn test_oauth2_token_endpoint_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad client"))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthScheme::OAuth2ClientCredentials {
        token_url: format!("{}/oauth/token", mock_server.uri()),
        client_id: "nope".to_string(),
        client_secret: "nope".to_string(),
        scopes: vec![],
        token_body: HashMap::new(),
    });

    let client = reqwest::Client::new();
    let req = client.get(format!("{}/data", mock_server.uri()));
    let err = auth.apply(req).await.unwrap_err();

    assert!(matches!(err, crate::error::Error::OAuth2 { .. }));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_oauth2_refresh_token_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=rt-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "at-fresh",
            "expires_in": 600
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Authorization", "Bearer at-fresh"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthScheme::OAuth2RefreshToken {
        token_url: format!("{}/oauth/token", mock_server.uri()),
        client_id: "c".to_string(),
        client_secret: "s".to_string(),
        refresh_token: "rt-9".to_string(),
    });

    let client = reqwest::Client::new();
    let req = client.get(format!("{}/data", mock_server.uri()));
    let response = auth.apply(req).await.unwrap().send().await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_clear_cache_forces_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "at-x",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthScheme::OAuth2ClientCredentials {
        token_url: format!("{}/oauth/token", mock_server.uri()),
        client_id: "c".to_string(),
        client_secret: "s".to_string(),
        scopes: vec![],
        token_body: HashMap::new(),
    });

    let client = reqwest::Client::new();
    let req = client.get("http://localhost/ignored");
    auth.apply(req).await.unwrap();

    auth.clear_cache().await;

    let req = client.get("http://localhost/ignored");
    auth.apply(req).await.unwrap();
}
