//! Authentication service — login, logout and session checks.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, warn};

use crate::config::{AdminSeed, AuthConfig};
use crate::entity::{principal, session};
use crate::error::{AuthError, AuthResult};
use crate::password;
use crate::principal_store::{PrincipalStore, UpsertPrincipal};
use crate::session_store::{SeaOrmSessionStore, SessionMetadata, SessionStore};

/// Input for the login flow.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub metadata: SessionMetadata,
}

/// Successful login result.
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub principal: principal::Model,
    /// Opaque token the client presents on later requests.
    pub session_token: String,
    pub login_time: DateTime<Utc>,
}

/// Authentication service.
///
/// Composes the credential check, the principal store and a
/// [`SessionStore`] into the operations exposed over HTTP.
#[derive(Debug, Clone)]
pub struct AuthService {
    principals: PrincipalStore,
    sessions: Arc<dyn SessionStore>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        principals: PrincipalStore,
        sessions: Arc<dyn SessionStore>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            principals,
            sessions,
            session_ttl,
        }
    }

    /// Wires the Sea-ORM stores onto a shared connection.
    pub fn from_connection(conn: DatabaseConnection, config: &AuthConfig) -> Self {
        Self::new(
            PrincipalStore::new(conn.clone()),
            Arc::new(SeaOrmSessionStore::new(conn)),
            config.session_ttl,
        )
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn principals(&self) -> &PrincipalStore {
        &self.principals
    }

    /// Authenticate with email + password and issue a session.
    ///
    /// An unknown email and a wrong password both fail with
    /// [`AuthError::InvalidCredentials`]; no session row is written for
    /// either. The session is issued before the login is stamped and is
    /// withdrawn if stamping fails, so a failed login never bumps the
    /// principal's counters or leaves a usable token behind.
    pub async fn login(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = input.email.trim();
        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".into(),
            ));
        }

        // 1. Look up the principal by email.
        let Some(principal) = self.principals.find_by_email(email).await? else {
            debug!(email, "login for unknown principal");
            return Err(AuthError::InvalidCredentials);
        };

        // 2. Verify password.
        if !password::verify_password(&input.password, &principal.password_hash)? {
            warn!(principal_id = principal.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        // 3. Issue the session.
        let session_token = self
            .sessions
            .create(principal.id, self.session_ttl, input.metadata)
            .await?;

        // 4. Stamp the login, withdrawing the session if that fails.
        let login_time = Utc::now();
        if let Err(e) = self.principals.record_login(principal.id, login_time).await {
            if let Err(undo) = self.sessions.invalidate(&session_token).await {
                warn!(principal_id = principal.id, error = %undo, "failed to withdraw session after login error");
            }
            return Err(e);
        }

        info!(principal_id = principal.id, role = %principal.role, "principal logged in");

        Ok(LoginOutput {
            principal,
            session_token,
            login_time,
        })
    }

    /// Invalidate a session. Never fails for an absent or missing token.
    pub async fn logout(&self, token: Option<&str>) -> AuthResult<()> {
        if let Some(token) = non_empty(token) {
            self.sessions.invalidate(token).await?;
            info!("session logged out");
        }
        Ok(())
    }

    /// Resolve a token to its live session.
    ///
    /// A session found past its expiry is deleted on the spot and reported
    /// as [`AuthError::SessionExpired`].
    pub async fn verify(&self, token: Option<&str>) -> AuthResult<session::Model> {
        let token = non_empty(token).ok_or(AuthError::MissingToken)?;

        let session = self
            .sessions
            .lookup(token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        if session.is_expired_at(Utc::now()) {
            self.sessions.invalidate(token).await?;
            debug!(owner_id = session.owner_id, "removed expired session on lookup");
            return Err(AuthError::SessionExpired);
        }

        Ok(session)
    }

    /// Profile of the principal owning the session.
    pub async fn who_am_i(&self, token: Option<&str>) -> AuthResult<principal::Model> {
        let session = self.verify(token).await?;
        self.principals
            .find_by_id(session.owner_id)
            .await?
            .ok_or(AuthError::NotFound("User"))
    }

    /// Sweep expired sessions on behalf of an authenticated administrator.
    pub async fn cleanup(&self, token: Option<&str>) -> AuthResult<u64> {
        let principal = self.who_am_i(token).await?;
        if !principal.role.is_admin() {
            warn!(principal_id = principal.id, role = %principal.role, "cleanup denied");
            return Err(AuthError::Forbidden);
        }

        let removed = self.sessions.sweep_expired().await?;
        info!(principal_id = principal.id, removed, "expired sessions cleaned up");
        Ok(removed)
    }

    /// Insert or refresh the bootstrap administrator.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> AuthResult<principal::Model> {
        let password_hash = password::hash_password(&seed.password)?;
        let admin = self
            .principals
            .upsert(UpsertPrincipal {
                email: seed.email.trim().to_owned(),
                name: seed.name.clone(),
                password_hash,
                role: seed.role,
            })
            .await?;

        info!(principal_id = admin.id, email = %admin.email, role = %admin.role, "admin principal seeded");
        Ok(admin)
    }
}

/// Drops missing or blank tokens. Anything else is passed through verbatim:
/// tokens are opaque and matched exactly.
fn non_empty(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.trim().is_empty())
}
