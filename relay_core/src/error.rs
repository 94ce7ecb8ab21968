//! Application error types and handling

use crate::mail::TransportError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),

    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::InvalidPayload(_) | AppError::MissingFields(_) => StatusCode::BAD_REQUEST,
            AppError::Transport(_) | AppError::Config(_) | AppError::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::MethodNotAllowed | AppError::InvalidPayload(_) => {
                json!({ "error": self.to_string() })
            }
            AppError::MissingFields(fields) => {
                tracing::debug!(?fields, "Rejected submission with empty fields");
                json!({ "error": self.to_string() })
            }
            AppError::Transport(err) => {
                tracing::error!("Email send error: {}", err);
                json!({
                    "error": "Failed to send email",
                    "details": err.to_string(),
                })
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                json!({ "error": "Internal server error" })
            }
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
