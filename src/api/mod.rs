//! HTTP surface of the auth service.
//!
//! [`app`] builds the complete router: the auth endpoints nested under
//! `/api/auth` plus a health check, wrapped in a request trace layer.

pub mod extractors;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::service::AuthService;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth: AuthService,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }
}

/// Auth endpoints, mounted at the router root.
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/verify", post(handlers::verify))
        .route("/me", get(handlers::me))
        .route("/cleanup", post(handlers::cleanup))
        .with_state(state)
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth_routes(state))
        .route("/api/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
}
