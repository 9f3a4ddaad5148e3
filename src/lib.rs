//! # Dreams Wide admin authentication
//!
//! Session-based authentication for the Dreams Wide job board, backed by
//! [Sea-ORM](https://crates.io/crates/sea-orm) and served with
//! [axum](https://crates.io/crates/axum).
//!
//! A principal logs in with email and password and receives an opaque
//! session token. The token is presented on later requests, either in a
//! JSON body (`/verify`, `/logout`) or as an `Authorization: Bearer` header
//! (`/me`, `/cleanup`). Sessions live for a fixed time-to-live (8 hours by
//! default) and are removed on logout, on the first lookup after they
//! expire, or by the periodic sweep.
//!
//! ## Features
//!
//! - Persistent principals and sessions in PostgreSQL (or SQLite)
//! - Argon2id password verification
//! - CSPRNG session tokens, opaque to clients
//! - Self-healing expiry plus a background expired-session sweep
//! - Schema migrations through `sea-orm-migration` (feature `migration`)
//!
//! ## Quick Start
//!
//! ```no_run
//! use dreamswide_auth::api::{app, AppState};
//! use dreamswide_auth::{AuthConfig, AuthService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::from_env()?;
//! let conn = Database::connect(config.database_url.as_str()).await?;
//!
//! let auth = AuthService::from_connection(conn, &config);
//! auth.seed_admin(&config.admin).await?;
//!
//! let router = app(AppState::new(auth));
//! let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod entity;
pub mod error;
#[cfg(feature = "migration")]
pub mod migration;
pub mod password;
pub mod principal_store;
pub mod service;
pub mod session_store;
pub mod sweep;
pub mod token;

pub use config::{AdminSeed, AuthConfig, ConfigError};
pub use error::{AuthError, AuthResult};
pub use principal_store::PrincipalStore;
pub use service::{AuthService, LoginInput, LoginOutput};
pub use session_store::{SeaOrmSessionStore, SessionMetadata, SessionStore};
pub use sweep::spawn_expired_sweep;
