//! Integration tests for the chat API.
//!
//! These drive the full router over fake upstream ports, covering both
//! accepted request forms, the degraded path, and client-error rejection.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::test_context;
use gantry_axum::bootstrap::CorsConfig;
use gantry_axum::create_router;
use gantry_core::domain::service::ServiceKind;

fn post_chat(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn permits_request_consults_compliance_service() {
    let ctx = test_context(
        &[ServiceKind::Compliance],
        Some("Based on the data, you need demolition consent."),
    );
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(post_chat(&serde_json::json!({
            "messages": [{ "role": "user", "content": "What permits do I need?" }]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["metadata"]["servicesConsulted"], serde_json::json!(["compliance"]));
    assert_eq!(body["metadata"]["backendDataIncluded"], true);
    assert_eq!(body["message"]["role"], "assistant");
    assert!(body["id"].as_str().unwrap().starts_with("chat_"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn single_message_greeting_passes_completion_through() {
    let ctx = test_context(&[ServiceKind::Compliance], Some("Hi there!"));
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(post_chat(&serde_json::json!({ "message": "hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["message"]["content"], "Hi there!");
    assert_eq!(body["metadata"]["servicesConsulted"], serde_json::json!([]));
    assert_eq!(body["metadata"]["backendDataIncluded"], false);
}

#[tokio::test]
async fn unconfigured_provider_degrades_instead_of_erroring() {
    let ctx = test_context(&[], None);
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(post_chat(&serde_json::json!({ "message": "hello" })))
        .await
        .unwrap();

    // Degraded capability is still an HTTP-level success.
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["metadata"]["processingMode"], "static-fallback");
    assert_eq!(body["metadata"]["backendDataIncluded"], false);
    assert!(!body["message"]["content"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn empty_body_is_a_client_error() {
    let ctx = test_context(&[ServiceKind::Compliance], Some("unused"));
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(post_chat(&serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;

    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("messages"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn empty_message_list_is_a_client_error() {
    let ctx = test_context(&[], Some("unused"));
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(post_chat(&serde_json::json!({ "messages": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_role_is_a_client_error() {
    let ctx = test_context(&[], Some("unused"));
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(post_chat(&serde_json::json!({
            "messages": [{ "role": "tool", "content": "x" }]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_configuration_summary() {
    let ctx = test_context(&[ServiceKind::Risk, ServiceKind::Budget], None);
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["env"]["completionConfigured"], false);
    assert_eq!(body["env"]["delegateConfigured"], false);
    assert_eq!(body["env"]["servicesRegistered"], 2);
    assert!(body["uptimeSeconds"].is_number());
}
