//! Service configuration, read from the process environment.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::entity::principal::Role;

/// Default session lifetime: 8 hours.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

/// Longest accepted session lifetime: 30 days.
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// The principal upserted at startup so that an administrator can log in.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Database connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Address the HTTP server listens on (default `127.0.0.1:3001`).
    pub bind_addr: SocketAddr,
    /// Lifetime of a newly issued session (default: 8 hours).
    pub session_ttl: chrono::Duration,
    /// Period of the background expired-session sweep. `None` disables it.
    pub cleanup_interval: Option<Duration>,
    /// Upper bound of the database connection pool (default: 10).
    pub db_max_connections: u32,
    pub admin: AdminSeed,
}

impl AuthConfig {
    /// Builds the configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = parse_or(&lookup, "BIND_ADDR", "127.0.0.1:3001".parse().ok())?;
        let session_ttl_secs: u64 =
            parse_or(&lookup, "SESSION_TTL_SECS", Some(DEFAULT_SESSION_TTL_SECS))?;
        if session_ttl_secs == 0 || session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_SECS",
                reason: format!("must be between 1 and {MAX_SESSION_TTL_SECS}"),
            });
        }
        let cleanup_interval_secs: u64 = parse_or(&lookup, "CLEANUP_INTERVAL_SECS", Some(3600))?;
        let db_max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", Some(10))?;

        let admin = AdminSeed {
            email: lookup("ADMIN_EMAIL").unwrap_or_else(|| "admin@dreamswide.et".into()),
            password: lookup("ADMIN_PASSWORD").unwrap_or_else(|| "admin123".into()),
            name: lookup("ADMIN_NAME").unwrap_or_else(|| "Dreams Wide Admin".into()),
            role: parse_or(&lookup, "ADMIN_ROLE", Some(Role::SuperAdmin))?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            // Bounded by MAX_SESSION_TTL_SECS above
            session_ttl: chrono::Duration::seconds(session_ttl_secs as i64),
            cleanup_interval: (cleanup_interval_secs > 0)
                .then(|| Duration::from_secs(cleanup_interval_secs)),
            db_max_connections,
            admin,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => default.ok_or(ConfigError::Missing(key)),
    }
}
