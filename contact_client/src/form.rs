//! Mutable form state with an in-flight guard around submission

use crate::{
    client::ContactClient,
    status::{SubmissionStatus, IN_FLIGHT_MESSAGE},
    ContactSubmission,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::debug;
use uuid::Uuid;

/// Shared flag telling the page whether a submission is outstanding.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sets the flag unless it is already set. The flag clears when the guard drops.
    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(Arc::clone(&self.0)))
    }
}

#[must_use = "the in-flight flag clears as soon as the guard is dropped"]
#[derive(Debug)]
pub struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    in_flight: InFlight,
    status: Option<SubmissionStatus>,
    idempotency_key: String,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            subject: String::new(),
            message: String::new(),
            in_flight: InFlight::default(),
            status: None,
            idempotency_key: Uuid::new_v4().to_string(),
        }
    }

    pub fn submission(&self) -> ContactSubmission {
        ContactSubmission {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        }
    }

    /// A handle the page can poll to disable its submit control.
    pub fn in_flight(&self) -> InFlight {
        self.in_flight.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_set()
    }

    pub fn status(&self) -> Option<&SubmissionStatus> {
        self.status.as_ref()
    }

    /// Empties all four fields and starts a new idempotency key.
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.subject.clear();
        self.message.clear();
        self.idempotency_key = Uuid::new_v4().to_string();
    }

    pub async fn submit(&mut self, client: &ContactClient) -> SubmissionStatus {
        self.status = None;

        let Some(_guard) = self.in_flight.try_acquire() else {
            debug!("Submit ignored while a request is outstanding");
            let status = SubmissionStatus::error(IN_FLIGHT_MESSAGE);
            self.status = Some(status.clone());
            return status;
        };

        let status = client
            .submit_with_key(&self.submission(), Some(&self.idempotency_key))
            .await;

        if status.is_success() {
            self.reset();
        }

        self.status = Some(status.clone());
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_clears_flag_on_drop() {
        let flag = InFlight::default();
        assert!(!flag.is_set());

        let guard = flag.try_acquire().expect("flag starts clear");
        assert!(flag.is_set());
        assert!(flag.try_acquire().is_none());

        drop(guard);
        assert!(!flag.is_set());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn test_reset_rotates_key() {
        let mut form = ContactForm::new();
        form.name = "Ada".to_string();
        form.message = "Hi".to_string();
        let key = form.idempotency_key.clone();

        form.reset();

        assert_eq!(form.submission(), ContactSubmission::default());
        assert_ne!(form.idempotency_key, key);
    }
}
