//! Authentication error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the auth service and its HTTP handlers.
///
/// Credential and session failures carry deliberately generic messages so a
/// caller cannot tell a wrong password from an unknown email, or a forged
/// token from an expired one that has already been swept.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No session token provided")]
    MissingToken,

    #[error("Invalid session")]
    InvalidSession,

    #[error("Session expired")]
    SessionExpired,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("password hashing error: {0}")]
    Password(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidSession
            | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Database(_) | AuthError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller. Internal failures never leak detail.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Database(_) | AuthError::Password(_) => "Internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "auth request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "auth request rejected");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
