//! Router-level tests for `POST /send-notification`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use push_notification_service::models::{Notification, TopicMessage};
use push_notification_service::services::{MockPushProvider, PushProvider};
use push_notification_service::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

fn app(provider: Arc<MockPushProvider>) -> Router {
    build_router(AppState::new(provider as Arc<dyn PushProvider>))
}

async fn post_raw(app: Router, body: impl Into<Body>) -> (StatusCode, String) {
    post_with_content_type(app, Some("application/json"), body).await
}

async fn post_with_content_type(
    app: Router,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, String) {
    let mut request = Request::builder().method("POST").uri("/send-notification");
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }

    let response = app
        .oneshot(request.body(body.into()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_json(app: Router, payload: Value) -> (StatusCode, String) {
    post_raw(app, payload.to_string()).await
}

#[tokio::test]
async fn valid_request_is_forwarded_once() {
    let provider = Arc::new(MockPushProvider::new());

    let (status, body) = post_json(
        app(provider.clone()),
        json!({
            "topic": "common",
            "title": "New Notification",
            "body": "This is a test notification"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Successfully sent message");
    assert_eq!(provider.send_count(), 1);
    assert_eq!(
        provider.sent_messages(),
        vec![TopicMessage {
            notification: Notification {
                title: "New Notification".to_string(),
                body: "This is a test notification".to_string(),
            },
            topic: "common".to_string(),
        }]
    );
}

#[tokio::test]
async fn empty_title_is_rejected_without_dispatch() {
    let provider = Arc::new(MockPushProvider::new());

    let (status, body) = post_json(
        app(provider.clone()),
        json!({"topic": "common", "title": "", "body": "x"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing required parameters: topic, title, body");
    assert_eq!(provider.send_count(), 0);
}

#[tokio::test]
async fn empty_object_is_rejected_without_dispatch() {
    let provider = Arc::new(MockPushProvider::new());

    let (status, body) = post_json(app(provider.clone()), json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing required parameters: topic, title, body");
    assert_eq!(provider.send_count(), 0);
}

#[tokio::test]
async fn each_missing_field_is_rejected() {
    let cases = [
        json!({"title": "t", "body": "b"}),
        json!({"topic": "common", "body": "b"}),
        json!({"topic": "common", "title": "t"}),
        json!({"topic": "", "title": "t", "body": "b"}),
        json!({"topic": "common", "title": "t", "body": ""}),
    ];

    for payload in cases {
        let provider = Arc::new(MockPushProvider::new());
        let (status, _) = post_json(app(provider.clone()), payload.clone()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert_eq!(provider.send_count(), 0, "payload: {}", payload);
    }
}

#[tokio::test]
async fn non_string_fields_are_rejected() {
    let provider = Arc::new(MockPushProvider::new());

    let (status, _) = post_json(
        app(provider.clone()),
        json!({"topic": "common", "title": 7, "body": "x"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(provider.send_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let provider = Arc::new(MockPushProvider::new());

    let (status, body) = post_raw(app(provider.clone()), "{\"topic\": \"common\",").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing required parameters: topic, title, body");
    assert_eq!(provider.send_count(), 0);
}

#[tokio::test]
async fn missing_content_type_is_rejected_without_dispatch() {
    let provider = Arc::new(MockPushProvider::new());

    let (status, body) = post_with_content_type(
        app(provider.clone()),
        None,
        json!({"topic": "common", "title": "t", "body": "b"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing required parameters: topic, title, body");
    assert_eq!(provider.send_count(), 0);
}

#[tokio::test]
async fn non_json_content_type_is_rejected_without_dispatch() {
    let provider = Arc::new(MockPushProvider::new());

    let (status, body) = post_with_content_type(
        app(provider.clone()),
        Some("text/plain"),
        json!({"topic": "common", "title": "t", "body": "b"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing required parameters: topic, title, body");
    assert_eq!(provider.send_count(), 0);
}

#[tokio::test]
async fn json_content_type_with_charset_is_accepted() {
    let provider = Arc::new(MockPushProvider::new());

    let (status, _) = post_with_content_type(
        app(provider.clone()),
        Some("application/json; charset=utf-8"),
        json!({"topic": "common", "title": "t", "body": "b"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.send_count(), 1);
}

#[tokio::test]
async fn whitespace_only_field_is_accepted() {
    let provider = Arc::new(MockPushProvider::new());

    let (status, body) = post_json(
        app(provider.clone()),
        json!({"topic": " ", "title": "t", "body": "b"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Successfully sent message");
    assert_eq!(provider.send_count(), 1);
    assert_eq!(provider.sent_messages()[0].topic, " ");
}

#[tokio::test]
async fn provider_failure_maps_to_generic_500() {
    let provider = Arc::new(MockPushProvider::failing());

    let (status, body) = post_json(
        app(provider.clone()),
        json!({"topic": "common", "title": "t", "body": "b"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error sending message");
    assert!(!body.contains("Requested entity was not found"));
    assert_eq!(provider.send_count(), 1);
}

#[tokio::test]
async fn identical_requests_are_not_deduplicated() {
    let provider = Arc::new(MockPushProvider::new());
    let payload = json!({"topic": "common", "title": "t", "body": "b"});

    let (first, _) = post_json(app(provider.clone()), payload.clone()).await;
    let (second, _) = post_json(app(provider.clone()), payload).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(provider.send_count(), 2);
}

#[tokio::test]
async fn get_is_not_allowed_on_dispatch_route() {
    let provider = Arc::new(MockPushProvider::new());

    let response = app(provider.clone())
        .oneshot(
            Request::builder()
                .uri("/send-notification")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(provider.send_count(), 0);
}
