//! Route table

use crate::{
    handlers::{contact, health},
    AppState,
};
use axum::{
    routing::{get, post, MethodRouter},
    Router,
};

pub const CONTACT_PATH: &str = "/api/contact";
/// Path exposed by the earlier serverless deployment. Existing forms still post here.
pub const LEGACY_CONTACT_PATH: &str = "/.netlify/functions/sendEmail";

fn contact_route() -> MethodRouter<AppState> {
    post(contact::handle_contact).fallback(contact::handle_method_not_allowed)
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::handle_health))
        .route(CONTACT_PATH, contact_route())
        .route(LEGACY_CONTACT_PATH, contact_route())
}
