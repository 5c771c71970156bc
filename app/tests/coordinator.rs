//! Request-lifecycle tests against a scripted transport
//!
//! Each test checks the loading slice transitions the store actually saw, as
//! well as the request the transport received.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

mod common;

use common::{data, drain, harness, page_patches};
use serde_json::json;
use starter_app::request::FailureKind;
use starter_app::state::AppAction;
use starter_app::state::auth::{AuthAction, AuthPatch};
use starter_app::state::page::{PagePatch, PageState};
use starter_app::{ClientConfig, LoaderPolicy, RequestDescriptor};
use starter_http::{HttpMethod, Payload, ResponseType, TransportError};
use starter_testing::{MockReply, MockTransport};
use std::time::Duration;

fn config() -> ClientConfig {
    ClientConfig::default().with_base_url("http://api.test")
}

#[tokio::test]
async fn test_page_loader_raised_then_cleared_on_success() {
    let transport = MockTransport::new().route("/api/items", MockReply::json(200, &json!({"items": []})));
    let (store, coordinator, mut actions) = harness(transport, config());

    let payload = coordinator
        .execute(RequestDescriptor::new("/api/items").with_loader_text("Fetching items"), &store)
        .await
        .unwrap();

    assert_eq!(payload, Payload::Json(json!({"items": []})));
    assert_eq!(
        page_patches(&drain(&mut actions)),
        vec![
            PagePatch::page_loading(true).with_text("Fetching items"),
            PagePatch::page_loading(false).with_text(""),
        ]
    );

    let page = store.state(|s| s.page.clone()).await;
    assert!(!page.page_loading);
    assert_eq!(page.page_loader_text, "");
}

#[tokio::test]
async fn test_modal_loader_wins_and_is_cleared_on_failure() {
    let transport = MockTransport::new().reply(MockReply::status(500, "boom"));
    let (store, coordinator, mut actions) = harness(transport, config());

    let failure = coordinator
        .execute(
            RequestDescriptor::new("/api/items")
                .with_modal_loader(true)
                .with_auth_loader(true),
            &store,
        )
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Status);
    assert_eq!(failure.status, Some(500));
    assert_eq!(failure.data, Some(json!("boom")));
    assert!(!failure.is_network_error);

    assert_eq!(
        page_patches(&drain(&mut actions)),
        vec![PagePatch::modal_loading(true), PagePatch::modal_loading(false)]
    );
    assert_eq!(store.state(|s| s.page.clone()).await, PageState {
        page_loader_text: "Loading...".to_string(),
        ..PageState::default()
    });
}

#[tokio::test]
async fn test_no_loader_means_no_page_mutations() {
    let transport = MockTransport::new().reply(MockReply::json(200, &json!(true)));
    let (store, coordinator, mut actions) = harness(transport, config());

    coordinator
        .execute(RequestDescriptor::new("/api/ping").with_loader(false), &store)
        .await
        .unwrap();

    assert!(page_patches(&drain(&mut actions)).is_empty());
}

#[tokio::test]
async fn test_412_is_success() {
    let transport = MockTransport::new().reply(MockReply::json(412, &json!({"reason": "already verified"})));
    let (store, coordinator, _actions) = harness(transport, config());

    let payload = coordinator
        .execute(RequestDescriptor::new("/api/auth/verify-email"), &store)
        .await
        .unwrap();

    assert_eq!(payload, Payload::Json(json!({"reason": "already verified"})));
}

#[tokio::test]
async fn test_get_sends_query_and_token() {
    let transport = MockTransport::new().reply(MockReply::json(200, &json!([])));
    let (store, coordinator, _actions) = harness(transport.clone(), config());

    let _ = store
        .send(AppAction::Auth(AuthAction::UpdateUserState(AuthPatch {
            is_authenticated: Some(true),
            token: Some(Some("abc".to_string())),
            ..AuthPatch::default()
        })))
        .await;

    coordinator
        .execute(
            RequestDescriptor::new("/api/items").with_data(data(json!({"page": 2, "tags": ["a", "b"]}))),
            &store,
        )
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url, "http://api.test/api/items");
    assert_eq!(
        request.query,
        vec![
            ("page".to_string(), "2".to_string()),
            ("tags[]".to_string(), "a".to_string()),
            ("tags[]".to_string(), "b".to_string()),
        ]
    );
    assert_eq!(request.body, None);
    assert_eq!(request.header("Authorization"), Some("bearer abc"));
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(request.timeout, Some(Duration::from_millis(20_000)));
}

#[tokio::test]
async fn test_post_sends_body_without_token_when_signed_out() {
    let transport = MockTransport::new().reply(MockReply::status(201, ""));
    let (store, coordinator, _actions) = harness(transport.clone(), config());

    let payload = coordinator
        .execute(
            RequestDescriptor::new("/api/items")
                .with_method(HttpMethod::Post)
                .with_data(data(json!({"name": "lamp"}))),
            &store,
        )
        .await
        .unwrap();

    assert_eq!(payload, Payload::Json(serde_json::Value::Null));

    let request = transport.last_request().unwrap();
    assert!(request.query.is_empty());
    assert_eq!(request.body_text(), Some(r#"{"name":"lamp"}"#));
    assert_eq!(request.header("Authorization"), None);
}

#[tokio::test]
async fn test_text_response_type() {
    let transport = MockTransport::new().reply(MockReply::status(200, "pong"));
    let (store, coordinator, _actions) = harness(transport, config());

    let payload = coordinator
        .execute(
            RequestDescriptor::new("/api/ping").with_response_type(ResponseType::Text),
            &store,
        )
        .await
        .unwrap();

    assert_eq!(payload, Payload::Text("pong".to_string()));
}

#[tokio::test]
async fn test_undecodable_body_is_decode_failure() {
    let transport = MockTransport::new().reply(MockReply::status(200, "<html>"));
    let (store, coordinator, mut actions) = harness(transport, config());

    let failure = coordinator
        .execute(RequestDescriptor::new("/api/items"), &store)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Decode);
    assert_eq!(failure.status, Some(200));
    assert_eq!(page_patches(&drain(&mut actions)).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_network_failure_and_clears_loader() {
    let transport = MockTransport::new().reply(MockReply::json(200, &json!({})).after(Duration::from_secs(60)));
    let (store, coordinator, mut actions) = harness(transport, config());

    let failure = coordinator
        .execute(
            RequestDescriptor::new("/api/slow")
                .with_timeout(Duration::from_millis(100))
                .with_force_fe_hide_enqueue_bar(true),
            &store,
        )
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Timeout);
    assert_eq!(failure.name(), "TimeoutError");
    assert!(failure.is_network_error);
    assert_eq!(failure.status, None);
    assert!(failure.force_fe_hide_enqueue_bar);

    assert_eq!(page_patches(&drain(&mut actions)).len(), 2);
    assert!(!store.state(|s| s.page.page_loading).await);
}

#[tokio::test(start_paused = true)]
async fn test_zero_timeout_waits_for_slow_transport() {
    let transport = MockTransport::new().reply(MockReply::json(200, &json!("late")).after(Duration::from_secs(120)));
    let (store, coordinator, _actions) = harness(transport.clone(), config());

    let payload = coordinator
        .execute(RequestDescriptor::new("/api/slow").with_timeout(Duration::ZERO), &store)
        .await
        .unwrap();

    assert_eq!(payload, Payload::Json(json!("late")));
    assert_eq!(transport.last_request().unwrap().timeout, None);
}

#[tokio::test]
async fn test_connection_failure_is_network_failure() {
    let transport = MockTransport::new().reply(MockReply::Fail(TransportError::Connect("refused".into())));
    let (store, coordinator, _actions) = harness(transport, config());

    let failure = coordinator
        .execute(RequestDescriptor::new("/api/items"), &store)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Network);
    assert!(failure.is_network_error);
    assert_eq!(failure.status, None);
    assert!(!failure.force_fe_hide_enqueue_bar);
}

#[tokio::test]
async fn test_transport_panic_is_contained_and_loader_cleared() {
    let transport = MockTransport::new().reply(MockReply::Panic);
    let (store, coordinator, mut actions) = harness(transport, config());

    let failure = coordinator
        .execute(RequestDescriptor::new("/api/items").with_auth_loader(true), &store)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Internal);
    assert_eq!(
        page_patches(&drain(&mut actions)),
        vec![PagePatch::auth_loading(true), PagePatch::auth_loading(false)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_requests_last_writer_wins() {
    let transport = MockTransport::new()
        .route("/fast", MockReply::json(200, &json!(1)).after(Duration::from_millis(10)))
        .route("/slow", MockReply::json(200, &json!(2)).after(Duration::from_millis(50)));
    let (store, coordinator, _actions) = harness(transport, config());

    let slow = {
        let store = store.clone();
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.execute(RequestDescriptor::new("/slow"), &store).await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;

    coordinator
        .execute(RequestDescriptor::new("/fast"), &store)
        .await
        .unwrap();

    // The first request to finish lowers the shared flag.
    assert!(!store.state(|s| s.page.page_loading).await);

    slow.await.unwrap().unwrap();
    assert!(!store.state(|s| s.page.page_loading).await);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_requests_ref_counted() {
    let transport = MockTransport::new()
        .route("/fast", MockReply::json(200, &json!(1)).after(Duration::from_millis(10)))
        .route("/slow", MockReply::json(200, &json!(2)).after(Duration::from_millis(50)));
    let (store, coordinator, mut actions) =
        harness(transport, config().with_loader_policy(LoaderPolicy::RefCounted));

    let slow = {
        let store = store.clone();
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.execute(RequestDescriptor::new("/slow"), &store).await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;

    coordinator
        .execute(RequestDescriptor::new("/fast"), &store)
        .await
        .unwrap();

    assert!(store.state(|s| s.page.page_loading).await);

    slow.await.unwrap().unwrap();
    assert!(!store.state(|s| s.page.page_loading).await);

    let ends = page_patches(&drain(&mut actions))
        .into_iter()
        .filter(|patch| patch.page_loading == Some(false))
        .count();
    assert_eq!(ends, 1);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_request_does_not_pin_ref_counted_loader() {
    let transport = MockTransport::new()
        .route("/slow", MockReply::json(200, &json!(1)).after(Duration::from_secs(5)))
        .route("/ok", MockReply::json(200, &json!(2)));
    let (store, coordinator, _actions) =
        harness(transport, config().with_loader_policy(LoaderPolicy::RefCounted));

    let abandoned = tokio::time::timeout(
        Duration::from_millis(10),
        coordinator.execute(RequestDescriptor::new("/slow"), &store),
    )
    .await;
    assert!(abandoned.is_err());
    assert!(store.state(|s| s.page.page_loading).await);

    coordinator
        .execute(RequestDescriptor::new("/ok"), &store)
        .await
        .unwrap();

    assert!(!store.state(|s| s.page.page_loading).await);
}

#[tokio::test]
async fn test_typed_response_keeps_status_on_shape_mismatch() {
    #[derive(Debug, serde::Deserialize)]
    struct Profile {
        #[allow(dead_code)]
        id: u32,
    }

    let transport = MockTransport::new().reply(MockReply::json(412, &json!({"reason": "pending"})));
    let (store, coordinator, mut actions) = harness(transport, config());

    let failure = coordinator
        .execute_json::<Profile, _>(RequestDescriptor::new("/api/profile"), &store)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Decode);
    assert_eq!(failure.status, Some(412));
    assert_eq!(failure.data, Some(json!({"reason": "pending"})));
    assert_eq!(page_patches(&drain(&mut actions)).len(), 2);
}
