//! Core library for the contact relay: validates contact form submissions and
//! relays them as email to the site owner, with an acknowledgment to the sender.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod idempotency;
pub mod mail;
pub mod middleware;
pub mod models;
pub mod relay;

pub use crate::config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::routes::{create_routes, CONTACT_PATH, LEGACY_CONTACT_PATH};
pub use idempotency::IdempotencyWindow;
pub use mail::{LogTransport, MailTransport, MemoryTransport, OutgoingEmail, SmtpMailTransport, TransportError};
pub use models::{ContactResponse, ContactSubmission};
pub use relay::{ContactRelay, DispatchOutcome};

use axum::Router;
use crate::config::TransportKind;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub relay: ContactRelay,
    pub idempotency: Option<IdempotencyWindow>,
}

impl AppState {
    pub fn new(relay: ContactRelay) -> Self {
        Self {
            app_name: "Contact Relay".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            relay,
            idempotency: None,
        }
    }

    /// Builds the state from loaded configuration around an already constructed transport.
    pub fn from_config(config: &AppConfig, transport: Arc<dyn MailTransport>) -> Result<Self> {
        let relay = ContactRelay::new(transport, &config.mail)?;
        let mut state = Self::new(relay);

        if config.idempotency.enable {
            state = state.with_idempotency(IdempotencyWindow::new(&config.idempotency));
        }

        Ok(state)
    }

    pub fn with_idempotency(mut self, window: IdempotencyWindow) -> Self {
        self.idempotency = Some(window);
        self
    }
}

/// The transport selected by `mail.transport`.
pub fn build_transport(config: &AppConfig) -> Result<Arc<dyn MailTransport>> {
    let transport: Arc<dyn MailTransport> = match config.mail.transport {
        TransportKind::Smtp => Arc::new(SmtpMailTransport::new(&config.mail)?),
        TransportKind::Log => Arc::new(LogTransport),
    };
    Ok(transport)
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(middleware::cors::cors_layer_from_config(&config.cors))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
