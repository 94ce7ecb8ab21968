//! HTTP submission to the contact relay

use crate::{
    error::ClientError,
    status::{SubmissionStatus, INCOMPLETE_MESSAGE, NETWORK_FALLBACK, REJECTED_FALLBACK},
    ContactSubmission,
};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub send_idempotency_key: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000/api/contact".to_string(),
            timeout_seconds: None,
            send_idempotency_key: true,
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

/// Body returned by the relay, on success or failure.
#[derive(Debug, Default, Deserialize)]
struct RelayReply {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    details: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContactClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ContactClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let http = builder.build().map_err(ClientError::Build)?;
        Ok(Self { http, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Submits with a fresh idempotency key. Never fails: every outcome is a status.
    pub async fn submit(&self, submission: &ContactSubmission) -> SubmissionStatus {
        let key = Uuid::new_v4().to_string();
        self.submit_with_key(submission, Some(&key)).await
    }

    /// Submits reusing `key`, so a resubmission of the same form is delivered once.
    pub async fn submit_with_key(
        &self,
        submission: &ContactSubmission,
        key: Option<&str>,
    ) -> SubmissionStatus {
        if !submission.is_complete() {
            return SubmissionStatus::error(INCOMPLETE_MESSAGE);
        }

        match self.send(submission, key).await {
            Ok((status, reply)) => interpret(status, reply),
            Err(err) => {
                error!(error = %err, endpoint = %self.config.endpoint, "Error sending message");
                SubmissionStatus::error(NETWORK_FALLBACK)
            }
        }
    }

    async fn send(
        &self,
        submission: &ContactSubmission,
        key: Option<&str>,
    ) -> Result<(StatusCode, RelayReply), ClientError> {
        let mut request = self.http.post(&self.config.endpoint).json(submission);

        if let Some(key) = key.filter(|_| self.config.send_idempotency_key) {
            request = request.header(IDEMPOTENCY_HEADER, key);
        }

        let response = request.send().await.map_err(ClientError::Network)?;
        let status = response.status();

        let reply = response
            .json::<RelayReply>()
            .await
            .map_err(|source| ClientError::Decode {
                status: status.as_u16(),
                source,
            })?;

        debug!(status = status.as_u16(), success = reply.success, "Relay replied");
        Ok((status, reply))
    }
}

fn interpret(status: StatusCode, reply: RelayReply) -> SubmissionStatus {
    if status.is_success() && reply.success && reply.error.is_none() {
        return SubmissionStatus::success();
    }

    warn!(
        status = status.as_u16(),
        error = ?reply.error,
        details = ?reply.details,
        "Relay declined the submission"
    );

    let message = reply
        .error
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| REJECTED_FALLBACK.to_string());
    SubmissionStatus::error(message)
}
