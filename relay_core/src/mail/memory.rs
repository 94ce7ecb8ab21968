//! In-process transport that records emails instead of delivering them

use super::{MailTransport, OutgoingEmail, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct Inner {
    sent: Vec<OutgoingEmail>,
    attempts: usize,
    failing_attempts: HashSet<usize>,
    fail_all: Option<String>,
}

/// Records every delivered email. Intended for tests and local runs.
///
/// Failures can be scripted per attempt (1-based), which lets callers
/// reject only the acknowledgment or only the notification.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails with `reason`, like a rejected login would.
    pub fn failing(reason: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.inner.lock().fail_all = Some(reason.into());
        transport
    }

    pub fn fail_attempt(&self, attempt: usize) {
        self.inner.lock().failing_attempts.insert(attempt);
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.inner.lock().sent.clone()
    }

    pub fn attempts(&self) -> usize {
        self.inner.lock().attempts
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.attempts += 1;
        let attempt = inner.attempts;

        if let Some(reason) = &inner.fail_all {
            return Err(TransportError::Smtp(reason.clone()));
        }

        if inner.failing_attempts.contains(&attempt) {
            return Err(TransportError::Smtp(format!(
                "scripted failure on attempt {attempt}"
            )));
        }

        debug!(to = %email.to.email, subject = %email.subject, "Recorded email");
        inner.sent.push(email.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
