//! Integration tests for the reqwest transport and the fetch helper
//!
//! Run against a local `wiremock` server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use starter_http::fetch::{FetchRequest, fetch_json};
use starter_http::{FetchError, HttpMethod, ReqwestTransport, Transport, TransportError, TransportRequest};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_sends_query_headers_and_returns_any_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("page", "2"))
        .and(header("authorization", "bearer abc"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = TransportRequest::new(HttpMethod::Get, format!("{}/api/items", server.uri()));
    request.query = vec![("page".to_string(), "2".to_string())];
    request.set_header("Authorization", "bearer abc");

    let response = ReqwestTransport::new().send(request).await.unwrap();

    assert_eq!(response.status, 500);
    assert_eq!(response.body, b"boom");
}

#[tokio::test]
async fn test_sends_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"email": "a@b.c"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = TransportRequest::new(HttpMethod::Post, format!("{}/api/auth/login", server.uri()));
    request.set_header("Content-Type", "application/json");
    request.body = Some(json!({"email": "a@b.c"}).to_string().into_bytes());

    let response = ReqwestTransport::new().send(request).await.unwrap();

    assert_eq!(response.status, 200);
    assert!(
        response
            .headers
            .iter()
            .any(|(name, value)| name == "content-type" && value.starts_with("application/json"))
    );
}

#[tokio::test]
async fn test_timeout_is_reported_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let mut request = TransportRequest::new(HttpMethod::Get, format!("{}/slow", server.uri()));
    request.timeout = Some(Duration::from_millis(50));

    let err = ReqwestTransport::new().send(request).await.unwrap_err();

    assert_eq!(err, TransportError::Timeout);
    assert!(err.is_network());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let err = ReqwestTransport::new()
        .send(TransportRequest::new(HttpMethod::Get, format!("{uri}/gone")))
        .await
        .unwrap_err();

    assert!(err.is_network(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_invalid_url_is_not_network_error() {
    let err = ReqwestTransport::new()
        .send(TransportRequest::new(HttpMethod::Get, "not a url"))
        .await
        .unwrap_err();

    assert!(!err.is_network(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_fetch_json_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .and(query_param("tag", "collection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [1, 2]})))
        .mount(&server)
        .await;

    let serde_json::Value::Object(data) = json!({"tag": "collection"}) else {
        unreachable!()
    };
    let value = fetch_json(
        &ReqwestTransport::new(),
        FetchRequest::new(format!("{}/api/data", server.uri())).with_data(data),
    )
    .await
    .unwrap();

    assert_eq!(value, json!({"items": [1, 2]}));
}

#[tokio::test]
async fn test_fetch_json_treats_412_as_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(412).set_body_json(json!({"reason": "stale"})))
        .mount(&server)
        .await;

    let err = fetch_json(
        &ReqwestTransport::new(),
        FetchRequest::new(format!("{}/api/data", server.uri())),
    )
    .await
    .unwrap_err();

    match err {
        FetchError::Status { status, .. } => assert_eq!(status, 412),
        other => panic!("unexpected error: {other:?}"),
    }
}
