use super::{MailTransport, OutgoingEmail, TransportError};
use async_trait::async_trait;
use tracing::info;

/// Writes emails to the log instead of sending them, for running without an SMTP account.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
        info!(
            from = %email.from,
            to = %email.to,
            reply_to = ?email.reply_to.as_ref().map(|mb| mb.to_string()),
            subject = %email.subject,
            html_bytes = email.html.len(),
            "Mail transport in log mode, skipping delivery"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
