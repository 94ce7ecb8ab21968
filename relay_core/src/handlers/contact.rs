//! Contact form submission endpoint

use crate::{
    error::{AppError, Result},
    extractors::PayloadJson,
    idempotency::{IdempotencyWindow, IDEMPOTENCY_HEADER},
    models::{ContactResponse, ContactSubmission},
    AppState,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, Method},
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};

pub async fn handle_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    PayloadJson(submission): PayloadJson<ContactSubmission>,
) -> Result<Json<ContactResponse>> {
    submission.ensure_complete()?;

    let idempotency = state.idempotency.as_ref().and_then(|window| {
        headers
            .get(IDEMPOTENCY_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(IdempotencyWindow::normalize_key)
            .map(|key| (window, key))
    });

    let fingerprint = IdempotencyWindow::fingerprint(&submission);

    if let Some((window, key)) = &idempotency {
        if let Some(previous) = window.lookup(key, fingerprint) {
            info!(submitter = %submission.email, "Duplicate submission, returning recorded result");
            return Ok(Json(previous));
        }
    }

    let outcome = state.relay.dispatch(&submission).await?;
    let response = ContactResponse::sent(outcome.acknowledgment_sent);

    if let Some((window, key)) = idempotency {
        window.record(key, fingerprint, response.clone());
    }

    Ok(Json(response))
}

pub async fn handle_method_not_allowed(method: Method) -> impl IntoResponse {
    warn!(%method, "Rejected contact request with unsupported method");
    ([(header::ALLOW, "POST")], AppError::MethodNotAllowed)
}
