use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use relay_core::{create_app, AppConfig, AppState, MemoryTransport};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.mail.account = "owner@example.com".to_string();
    config.mail.password = "app-password".to_string();
    config.mail.owner_address = Some("inbox@example.com".to_string());
    config
}

pub fn setup_app(transport: &MemoryTransport) -> Router {
    setup_app_with_config(transport, &test_config())
}

pub fn setup_app_with_config(transport: &MemoryTransport, config: &AppConfig) -> Router {
    let state = AppState::from_config(config, Arc::new(transport.clone())).unwrap();
    create_app(state)
}

pub fn ada() -> Value {
    serde_json::json!({
        "name": "Ada",
        "email": "ada@example.com",
        "subject": "Hello",
        "message": "Hi\nthere",
    })
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
