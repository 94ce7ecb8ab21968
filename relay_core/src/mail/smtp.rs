//! SMTP delivery through lettre's async transport

use super::{MailTransport, OutgoingEmail, TransportError};
use crate::config::{MailConfig, TlsMode};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tracing::{debug, info};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpEndpoint {
    pub host: String,
    pub port: u16,
    pub tls: TlsMode,
}

/// Maps a provider name such as `gmail` to its submission endpoint.
pub fn resolve_service(service: &str) -> Option<SmtpEndpoint> {
    let (host, port, tls) = match service.trim().to_ascii_lowercase().as_str() {
        "gmail" | "googlemail" => ("smtp.gmail.com", 465, TlsMode::Wrapper),
        "outlook" | "hotmail" | "outlook365" => ("smtp-mail.outlook.com", 587, TlsMode::Starttls),
        "yahoo" => ("smtp.mail.yahoo.com", 465, TlsMode::Wrapper),
        "icloud" => ("smtp.mail.me.com", 587, TlsMode::Starttls),
        "zoho" => ("smtp.zoho.com", 465, TlsMode::Wrapper),
        "sendgrid" => ("smtp.sendgrid.net", 587, TlsMode::Starttls),
        "mailgun" => ("smtp.mailgun.org", 587, TlsMode::Starttls),
        "ses" => ("email-smtp.us-east-1.amazonaws.com", 587, TlsMode::Starttls),
        _ => return None,
    };

    Some(SmtpEndpoint {
        host: host.to_string(),
        port,
        tls,
    })
}

fn default_port(tls: TlsMode) -> u16 {
    match tls {
        TlsMode::Wrapper => 465,
        TlsMode::Starttls => 587,
        TlsMode::None => 25,
    }
}

impl SmtpEndpoint {
    /// Resolves the endpoint from the service name, applying explicit host/port/tls overrides.
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let resolved = resolve_service(&config.service);

        let (host, tls) = match (&config.smtp_host, resolved.as_ref()) {
            (Some(host), _) => (
                host.clone(),
                config
                    .tls
                    .or(resolved.as_ref().map(|r| r.tls))
                    .unwrap_or(TlsMode::Starttls),
            ),
            (None, Some(endpoint)) => (endpoint.host.clone(), config.tls.unwrap_or(endpoint.tls)),
            (None, None) => {
                return Err(AppError::Config(format!(
                    "Unknown mail service '{}' and no smtp_host configured",
                    config.service
                )))
            }
        };

        let port = config.smtp_port.unwrap_or_else(|| match &resolved {
            Some(endpoint) if endpoint.tls == tls && config.smtp_host.is_none() => endpoint.port,
            _ => default_port(tls),
        });

        Ok(Self { host, port, tls })
    }
}

pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    endpoint: SmtpEndpoint,
}

impl SmtpMailTransport {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let endpoint = SmtpEndpoint::from_config(config)?;
        let credentials = Credentials::new(config.account.clone(), config.password.clone());

        let builder = match endpoint.tls {
            TlsMode::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(&endpoint.host)
                .map_err(|e| AppError::Config(format!("Invalid SMTP relay: {e}")))?,
            TlsMode::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&endpoint.host)
                    .map_err(|e| AppError::Config(format!("Invalid SMTP relay: {e}")))?
            }
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&endpoint.host),
        };

        let mailer = builder
            .port(endpoint.port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        info!(
            service = %config.service,
            smtp_host = %endpoint.host,
            smtp_port = endpoint.port,
            tls = ?endpoint.tls,
            "SMTP transport configured"
        );

        Ok(Self { mailer, endpoint })
    }

    pub fn endpoint(&self) -> &SmtpEndpoint {
        &self.endpoint
    }
}

pub(crate) fn build_message(email: &OutgoingEmail) -> std::result::Result<Message, TransportError> {
    let mut builder = Message::builder()
        .from(email.from.clone())
        .to(email.to.clone())
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);

    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(reply_to.clone());
    }

    builder
        .body(email.html.clone())
        .map_err(|e| TransportError::Build(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> std::result::Result<(), TransportError> {
        let message = build_message(email)?;

        let response = self
            .mailer
            .send(message)
            .await
            .map_err(|e| TransportError::Smtp(e.to_string()))?;

        debug!(
            to = %email.to.email,
            code = %response.code(),
            "SMTP server accepted message"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::mailbox;

    fn mail_config(service: &str) -> MailConfig {
        MailConfig {
            service: service.to_string(),
            account: "owner@example.com".to_string(),
            password: "secret".to_string(),
            ..MailConfig::default()
        }
    }

    #[test]
    fn test_resolve_known_services() {
        let gmail = resolve_service("gmail").unwrap();
        assert_eq!(gmail.host, "smtp.gmail.com");
        assert_eq!(gmail.port, 465);
        assert_eq!(gmail.tls, TlsMode::Wrapper);

        let outlook = resolve_service("Hotmail").unwrap();
        assert_eq!(outlook.host, "smtp-mail.outlook.com");
        assert_eq!(outlook.tls, TlsMode::Starttls);

        assert!(resolve_service("carrier-pigeon").is_none());
    }

    #[test]
    fn test_endpoint_defaults_to_service() {
        let endpoint = SmtpEndpoint::from_config(&mail_config("gmail")).unwrap();
        assert_eq!(endpoint, resolve_service("gmail").unwrap());
    }

    #[test]
    fn test_endpoint_host_override() {
        let mut config = mail_config("unknown");
        config.smtp_host = Some("mail.internal".to_string());
        let endpoint = SmtpEndpoint::from_config(&config).unwrap();
        assert_eq!(endpoint.host, "mail.internal");
        assert_eq!(endpoint.tls, TlsMode::Starttls);
        assert_eq!(endpoint.port, 587);

        config.tls = Some(TlsMode::None);
        config.smtp_port = Some(1025);
        let endpoint = SmtpEndpoint::from_config(&config).unwrap();
        assert_eq!(endpoint.tls, TlsMode::None);
        assert_eq!(endpoint.port, 1025);
    }

    #[test]
    fn test_tls_override_changes_default_port() {
        let mut config = mail_config("gmail");
        config.tls = Some(TlsMode::Starttls);
        let endpoint = SmtpEndpoint::from_config(&config).unwrap();
        assert_eq!(endpoint.host, "smtp.gmail.com");
        assert_eq!(endpoint.port, 587);
    }

    #[test]
    fn test_unknown_service_without_host() {
        let result = SmtpEndpoint::from_config(&mail_config("carrier-pigeon"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_build_message_headers() {
        let email = OutgoingEmail {
            from: mailbox(Some("Portfolio Contact"), "owner@example.com").unwrap(),
            to: mailbox(None, "owner@example.com").unwrap(),
            reply_to: Some(mailbox(Some("Ada"), "ada@example.com").unwrap()),
            subject: "Portfolio Contact: Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        };

        let message = build_message(&email).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("Subject: Portfolio Contact: Hello"));
        assert!(raw.contains("Reply-To:"));
        assert!(raw.contains("ada@example.com"));
        assert!(raw.contains("text/html"));
    }

    #[tokio::test]
    async fn test_transport_builds_without_connecting() {
        let transport = SmtpMailTransport::new(&mail_config("gmail")).unwrap();
        assert_eq!(transport.name(), "smtp");
        assert_eq!(transport.endpoint().host, "smtp.gmail.com");
    }
}
