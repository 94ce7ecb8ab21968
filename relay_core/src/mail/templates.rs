//! Email bodies for the owner notification and the submitter acknowledgment

use super::{mailbox, OutgoingEmail, TransportError};
use crate::models::contact::ContactSubmission;
use askama::Template;
use lettre::message::Mailbox;

pub const NOTIFICATION_SUBJECT_PREFIX: &str = "Portfolio Contact: ";
pub const ACKNOWLEDGMENT_SUBJECT: &str = "Thank you for contacting me";

#[derive(Template)]
#[template(path = "emails/owner_notification.html")]
struct OwnerNotificationTemplate<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    /// Rendered with a `<br>` between lines.
    message_lines: Vec<&'a str>,
}

#[derive(Template)]
#[template(path = "emails/acknowledgment.html")]
struct AcknowledgmentTemplate<'a> {
    name: &'a str,
    signature: &'a str,
}

fn lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

fn render(template: impl Template, name: &str) -> Result<String, TransportError> {
    template
        .render()
        .map_err(|e| TransportError::Build(format!("Failed to render {name} email: {e}")))
}

pub fn notification_html(submission: &ContactSubmission) -> Result<String, TransportError> {
    render(
        OwnerNotificationTemplate {
            name: &submission.name,
            email: &submission.email,
            subject: &submission.subject,
            message_lines: lines(&submission.message),
        },
        "notification",
    )
}

pub fn acknowledgment_html(
    submission: &ContactSubmission,
    signature: &str,
) -> Result<String, TransportError> {
    render(
        AcknowledgmentTemplate {
            name: &submission.name,
            signature,
        },
        "acknowledgment",
    )
}

/// Notification to the site owner; replies go straight to the submitter.
pub fn owner_notification(
    submission: &ContactSubmission,
    sender: &Mailbox,
    owner: &Mailbox,
) -> Result<OutgoingEmail, TransportError> {
    let reply_to = mailbox(Some(&submission.name), &submission.email)?;

    Ok(OutgoingEmail {
        from: sender.clone(),
        to: owner.clone(),
        reply_to: Some(reply_to),
        subject: format!("{NOTIFICATION_SUBJECT_PREFIX}{}", submission.subject),
        html: notification_html(submission)?,
    })
}

pub fn acknowledgment(
    submission: &ContactSubmission,
    sender: &Mailbox,
    signature: &str,
) -> Result<OutgoingEmail, TransportError> {
    Ok(OutgoingEmail {
        from: sender.clone(),
        to: mailbox(Some(&submission.name), &submission.email)?,
        reply_to: None,
        subject: ACKNOWLEDGMENT_SUBJECT.to_string(),
        html: acknowledgment_html(submission, signature)?,
    })
}
