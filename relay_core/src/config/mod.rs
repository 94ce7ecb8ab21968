//! Layered application configuration

pub mod settings;

pub use settings::{
    AppConfig, CorsConfig, IdempotencyConfig, MailConfig, ServerConfig, TlsMode, TransportKind,
};
