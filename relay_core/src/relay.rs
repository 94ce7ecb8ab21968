//! Dispatches a validated submission as an owner notification and an acknowledgment

use crate::{
    config::MailConfig,
    error::Result,
    mail::{mailbox, templates, MailTransport},
    models::ContactSubmission,
};
use lettre::message::Mailbox;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub notification_sent: bool,
    pub acknowledgment_sent: bool,
}

#[derive(Clone)]
pub struct ContactRelay {
    transport: Arc<dyn MailTransport>,
    sender: Mailbox,
    owner: Mailbox,
    signature: String,
    acknowledgment_required: bool,
}

impl ContactRelay {
    pub fn new(transport: Arc<dyn MailTransport>, config: &MailConfig) -> Result<Self> {
        let sender = mailbox(Some(&config.from_name), &config.account)?;
        let owner = mailbox(None, config.owner_address())?;

        Ok(Self {
            transport,
            sender,
            owner,
            signature: config.signature.clone(),
            acknowledgment_required: config.acknowledgment_required,
        })
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Sends the notification, then the acknowledgment. A failed notification
    /// fails the dispatch; a failed acknowledgment only does so when required.
    pub async fn dispatch(&self, submission: &ContactSubmission) -> Result<DispatchOutcome> {
        submission.ensure_complete()?;

        let submission_id = Uuid::new_v4();
        info!(
            %submission_id,
            submitter = %submission.email,
            transport = self.transport.name(),
            "Dispatching contact submission"
        );

        let notification = templates::owner_notification(submission, &self.sender, &self.owner)?;
        self.transport.send(&notification).await?;
        info!(%submission_id, owner = %self.owner.email, "Owner notification sent");

        let acknowledgment_sent = match self.send_acknowledgment(submission).await {
            Ok(()) => {
                info!(%submission_id, "Acknowledgment sent");
                true
            }
            Err(err) if self.acknowledgment_required => return Err(err),
            Err(err) => {
                warn!(
                    %submission_id,
                    submitter = %submission.email,
                    error = %err,
                    "Acknowledgment failed after owner was notified"
                );
                false
            }
        };

        Ok(DispatchOutcome {
            notification_sent: true,
            acknowledgment_sent,
        })
    }

    async fn send_acknowledgment(&self, submission: &ContactSubmission) -> Result<()> {
        let email = templates::acknowledgment(submission, &self.sender, &self.signature)?;
        self.transport.send(&email).await?;
        Ok(())
    }
}
