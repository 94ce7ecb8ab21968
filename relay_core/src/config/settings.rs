use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mail: MailConfig,
    pub cors: CorsConfig,
    pub idempotency: IdempotencyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Smtp,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Implicit TLS from the first byte, usually port 465.
    Wrapper,
    /// Plain connection upgraded with STARTTLS, usually port 587.
    Starttls,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub transport: TransportKind,
    /// Well-known provider name, resolved to a relay host when `smtp_host` is unset.
    pub service: String,
    /// Authenticating account. Also the sender address.
    pub account: String,
    pub password: String,
    /// Mailbox receiving owner notifications. Falls back to `account`.
    pub owner_address: Option<String>,
    pub from_name: String,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub tls: Option<TlsMode>,
    /// When set, a failed acknowledgment email fails the whole request.
    pub acknowledgment_required: bool,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyConfig {
    pub enable: bool,
    pub window_seconds: u64,
    pub max_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            mail: MailConfig::default(),
            cors: CorsConfig::default(),
            idempotency: IdempotencyConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_seconds: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Smtp,
            service: "gmail".to_string(),
            account: String::new(),
            password: String::new(),
            owner_address: None,
            from_name: "Portfolio Contact".to_string(),
            smtp_host: None,
            smtp_port: None,
            tls: None,
            acknowledgment_required: false,
            signature: "Karthik".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self {
            enable: true,
            window_seconds: 300,
            max_entries: 1024,
        }
    }
}

/// Variables read by the earlier serverless deployment, mapped onto config keys.
const LEGACY_ENV: [(&str, &str); 4] = [
    ("EMAIL_SERVICE", "mail.service"),
    ("EMAIL_USER", "mail.account"),
    ("EMAIL_PASSWORD", "mail.password"),
    ("EMAIL_TO", "mail.owner_address"),
];

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new("config.toml");
        Self::load_from(path.exists().then_some(path))
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        for (var, key) in LEGACY_ENV {
            let value = std::env::var(var).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Message(
                "Max body size must be greater than 0".to_string(),
            ));
        }

        if self.idempotency.enable
            && (self.idempotency.window_seconds == 0 || self.idempotency.max_entries == 0)
        {
            return Err(ConfigError::Message(
                "Idempotency window and capacity must be greater than 0".to_string(),
            ));
        }

        if self.mail.account.is_empty() {
            return Err(ConfigError::Message(
                "Mail account cannot be empty".to_string(),
            ));
        }

        if self.mail.transport == TransportKind::Smtp && self.mail.password.is_empty() {
            return Err(ConfigError::Message(
                "Mail password cannot be empty when using SMTP".to_string(),
            ));
        }

        if self.mail.owner_address.is_none() {
            tracing::warn!("No owner address configured - notifications go to the mail account");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl MailConfig {
    pub fn owner_address(&self) -> &str {
        self.owner_address.as_deref().unwrap_or(&self.account)
    }
}
