use axum::{http::StatusCode, routing::post, Json, Router};
use contact_client::{
    status::{INCOMPLETE_MESSAGE, IN_FLIGHT_MESSAGE, NETWORK_FALLBACK, SUCCESS_MESSAGE},
    ClientConfig, ContactClient, ContactForm, SubmissionStatus,
};
use relay_core::{create_app, AppConfig, AppState, MemoryTransport, CONTACT_PATH};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn start_relay(transport: &MemoryTransport) -> ContactClient {
    let mut config = AppConfig::default();
    config.mail.account = "owner@example.com".to_string();
    config.mail.password = "app-password".to_string();

    let state = AppState::from_config(&config, Arc::new(transport.clone())).unwrap();
    let addr = serve(create_app(state)).await;

    ContactClient::new(ClientConfig::new(format!("http://{addr}{CONTACT_PATH}"))).unwrap()
}

async fn start_stub(app: Router) -> ContactClient {
    let addr = serve(app).await;
    ContactClient::new(ClientConfig::new(format!("http://{addr}/submit"))).unwrap()
}

fn filled_form() -> ContactForm {
    let mut form = ContactForm::new();
    form.name = "Ada".to_string();
    form.email = "ada@example.com".to_string();
    form.subject = "Hello".to_string();
    form.message = "Hi\nthere".to_string();
    form
}

#[tokio::test]
async fn test_success_resets_form() {
    let transport = MemoryTransport::new();
    let client = start_relay(&transport).await;
    let mut form = filled_form();

    let status = form.submit(&client).await;

    assert_eq!(status, SubmissionStatus::Success(SUCCESS_MESSAGE.to_string()));
    assert_eq!(form.status(), Some(&status));
    assert!(form.name.is_empty());
    assert!(form.email.is_empty());
    assert!(form.subject.is_empty());
    assert!(form.message.is_empty());
    assert!(!form.is_submitting());

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].html.contains("Hi<br>there"));
    assert_eq!(sent[1].to.email.to_string(), "ada@example.com");
}

#[tokio::test]
async fn test_incomplete_form_is_kept() {
    let transport = MemoryTransport::new();
    let client = start_relay(&transport).await;
    let mut form = filled_form();
    form.subject.clear();

    let status = form.submit(&client).await;

    assert_eq!(status, SubmissionStatus::error(INCOMPLETE_MESSAGE));
    assert_eq!(form.name, "Ada");
    assert_eq!(form.message, "Hi\nthere");
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn test_server_missing_fields_error_is_surfaced() {
    let transport = MemoryTransport::new();
    let client = start_relay(&transport).await;

    // Bypass the client-side check to exercise the server's 400
    let raw = reqwest::Client::new()
        .post(client.endpoint())
        .json(&serde_json::json!({ "name": "", "email": "a@b.com", "subject": "x", "message": "y" }))
        .send()
        .await
        .unwrap();
    assert_eq!(raw.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = raw.json().await.unwrap();
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn test_transport_failure_keeps_form() {
    let transport = MemoryTransport::failing("535 authentication failed");
    let client = start_relay(&transport).await;
    let mut form = filled_form();

    let status = form.submit(&client).await;

    assert_eq!(status, SubmissionStatus::error("Failed to send email"));
    assert_eq!(form.name, "Ada");
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_resubmitting_same_form_is_delivered_once() {
    let transport = MemoryTransport::new();
    let client = start_relay(&transport).await;
    let form = filled_form();

    // Two copies of one form share a key, like a retry after a lost response
    let mut first = form.clone();
    let mut second = form;
    assert!(first.submit(&client).await.is_success());
    assert!(second.submit(&client).await.is_success());

    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ContactClient::new(ClientConfig::new(format!("http://{addr}/api/contact"))).unwrap();
    let mut form = filled_form();

    let status = form.submit(&client).await;

    assert_eq!(status, SubmissionStatus::error(NETWORK_FALLBACK));
    assert!(!form.is_submitting());
    assert_eq!(form.email, "ada@example.com");
}

#[tokio::test]
async fn test_ok_status_with_error_body() {
    let client = start_stub(Router::new().route(
        "/submit",
        post(|| async { Json(serde_json::json!({ "error": "Mailbox full" })) }),
    ))
    .await;
    let mut form = filled_form();

    assert_eq!(form.submit(&client).await, SubmissionStatus::error("Mailbox full"));
    assert_eq!(form.name, "Ada");
}

#[tokio::test]
async fn test_malformed_response_body() {
    let client = start_stub(Router::new().route(
        "/submit",
        post(|| async { (StatusCode::OK, "<html>proxy error</html>") }),
    ))
    .await;
    let mut form = filled_form();

    assert_eq!(form.submit(&client).await, SubmissionStatus::error(NETWORK_FALLBACK));
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_in_flight_flag_spans_request() {
    let client = start_stub(Router::new().route(
        "/submit",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(serde_json::json!({ "success": true, "message": "Email sent successfully" }))
        }),
    ))
    .await;
    let mut form = filled_form();
    let flag = form.in_flight();

    let (status, observed) = tokio::join!(form.submit(&client), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        flag.is_set()
    });

    assert!(status.is_success());
    assert!(observed, "flag should be set while the request is outstanding");
    assert!(!flag.is_set());
}

#[tokio::test]
async fn test_second_submit_refused_while_in_flight() {
    let transport = MemoryTransport::new();
    let client = start_relay(&transport).await;
    let mut form = filled_form();

    let held = form.in_flight().try_acquire().unwrap();
    let status = form.submit(&client).await;
    assert_eq!(status, SubmissionStatus::error(IN_FLIGHT_MESSAGE));
    assert_eq!(transport.attempts(), 0);

    drop(held);
    assert!(form.submit(&client).await.is_success());
}
