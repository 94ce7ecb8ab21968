//! Client side of the contact form: holds the form state, submits it to the
//! relay and turns every outcome into a status the page can render.

pub mod client;
pub mod error;
pub mod form;
pub mod status;

pub use client::{ClientConfig, ContactClient};
pub use error::ClientError;
pub use form::{ContactForm, InFlight};
pub use status::SubmissionStatus;

use serde::Serialize;

/// The four fields sent to the relay as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .all(|field| !field.is_empty())
    }
}
