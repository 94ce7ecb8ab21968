//! Outbound mail: the transport seam and its implementations

pub mod log;
pub mod memory;
pub mod smtp;
pub mod templates;

pub use self::log::LogTransport;
pub use memory::MemoryTransport;
pub use smtp::{resolve_service, SmtpMailTransport, SmtpEndpoint};

use async_trait::async_trait;
use lettre::message::Mailbox;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub reply_to: Option<Mailbox>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid email address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

/// Delivers a single email. Implementations must be shareable across requests.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError>;

    fn name(&self) -> &'static str;
}

/// Parses `address` into a mailbox, attaching `name` as the display name when given.
pub fn mailbox(name: Option<&str>, address: &str) -> Result<Mailbox, TransportError> {
    let email = address
        .trim()
        .parse()
        .map_err(|e| TransportError::Address(format!("{address}: {e}")))?;

    Ok(Mailbox::new(name.map(str::to_string), email))
}
