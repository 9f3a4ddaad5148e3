//! Axum handlers for the auth endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::extractors::{BearerToken, RequestMeta};
use super::AppState;
use crate::entity::principal::{self, Role};
use crate::error::{AuthError, AuthResult};
use crate::service::LoginInput;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokenRequest {
    pub session_token: Option<String>,
}

/// Principal summary returned by a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub login_time: DateTime<Utc>,
    pub session_token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: LoginUser,
}

/// Profile returned by `GET /me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub last_login: Option<DateTime<Utc>>,
    pub login_count: i32,
}

impl From<principal::Model> for ProfileUser {
    fn from(model: principal::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            role: model.role,
            last_login: model.last_login,
            login_count: model.login_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: ProfileUser,
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    RequestMeta(metadata): RequestMeta,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "malformed login body");
        AuthError::Validation("Email and password are required".into())
    })?;

    let output = state
        .auth
        .login(LoginInput {
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
            metadata,
        })
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        user: LoginUser {
            id: output.principal.id,
            email: output.principal.email,
            name: output.principal.name,
            role: output.principal.role,
            login_time: output.login_time,
            session_token: output.session_token,
        },
    }))
}

/// `POST /logout`
///
/// Succeeds whether or not the token exists, and for unreadable bodies too.
pub async fn logout(
    State(state): State<AppState>,
    payload: Result<Json<SessionTokenRequest>, JsonRejection>,
) -> AuthResult<Json<Value>> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    state.auth.logout(request.session_token.as_deref()).await?;
    Ok(Json(json!({ "success": true })))
}

/// `POST /verify`
pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<SessionTokenRequest>, JsonRejection>,
) -> AuthResult<Json<Value>> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    state.auth.verify(request.session_token.as_deref()).await?;
    Ok(Json(json!({ "success": true, "valid": true })))
}

/// `GET /me`
pub async fn me(
    State(state): State<AppState>,
    token: BearerToken,
) -> AuthResult<Json<ProfileResponse>> {
    let principal = state.auth.who_am_i(token.as_deref()).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user: principal.into(),
    }))
}

/// `POST /cleanup`
pub async fn cleanup(
    State(state): State<AppState>,
    token: BearerToken,
) -> AuthResult<Json<Value>> {
    let removed = state.auth.cleanup(token.as_deref()).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Cleaned up {removed} expired sessions"),
    })))
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
