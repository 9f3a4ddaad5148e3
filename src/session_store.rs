use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::entity::session::{self, ActiveModel as SessionActiveModel, Entity as SessionEntity};
use crate::error::AuthResult;
use crate::token::generate_session_token;

/// Request metadata captured when a session is issued.
///
/// Stored for auditing only; it never takes part in validating a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetadata {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Storage backend for login sessions.
///
/// Implementations must guarantee that a token is unique among stored rows
/// and that a deleted token never becomes valid again.
#[async_trait]
pub trait SessionStore: Debug + Send + Sync {
    /// Issues a session for `owner_id` expiring `ttl` from now and returns its token.
    async fn create(
        &self,
        owner_id: i32,
        ttl: Duration,
        metadata: SessionMetadata,
    ) -> AuthResult<String>;

    /// Exact-match read. Expired rows are returned as-is; expiry policy
    /// belongs to the caller.
    async fn lookup(&self, token: &str) -> AuthResult<Option<session::Model>>;

    /// Deletes the session if present. Deleting an absent token is not an error.
    async fn invalidate(&self, token: &str) -> AuthResult<()>;

    /// Deletes every session whose expiry is strictly before now and returns
    /// how many rows were removed.
    async fn sweep_expired(&self) -> AuthResult<u64>;
}

/// A Sea-ORM backed session store.
///
/// `SeaOrmSessionStore` persists sessions in the `session` table through any
/// Sea-ORM connection (PostgreSQL in production, SQLite in tests).
///
/// # Database Schema
///
/// | Column      | Type                    | Description                             |
/// |-------------|-------------------------|-----------------------------------------|
/// | token       | TEXT (Primary Key)      | Opaque session token                    |
/// | owner_id    | INTEGER                 | Owning principal                        |
/// | expires_at  | TIMESTAMPTZ             | Expiration date of the session          |
/// | created_at  | TIMESTAMPTZ             | Creation date of the session            |
/// | user_agent  | TEXT NULL               | Request metadata                        |
/// | ip_address  | TEXT NULL               | Request metadata                        |
///
/// # Error Handling
///
/// Every Sea-ORM failure is surfaced as [`AuthError::Database`](crate::AuthError::Database),
/// which the HTTP layer reports as a generic 500.
#[derive(Debug, Clone)]
pub struct SeaOrmSessionStore {
    /// The Sea-ORM database connection used for database operations.
    conn: DatabaseConnection,
}

impl SeaOrmSessionStore {
    /// Creates a new session store on top of an established connection.
    ///
    /// The connection is shared, not owned: closing it is the caller's job.
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionStore for SeaOrmSessionStore {
    /// Inserts a new session row.
    ///
    /// Token generation and insertion run inside a transaction with
    /// collision detection: if the generated token is already stored, a new
    /// one is drawn until it is unique.
    async fn create(
        &self,
        owner_id: i32,
        ttl: Duration,
        metadata: SessionMetadata,
    ) -> AuthResult<String> {
        let txn = self.conn.begin().await?;

        // Token collision mitigation
        let mut token = generate_session_token();
        while SessionEntity::find_by_id(token.clone())
            .one(&txn)
            .await?
            .is_some()
        {
            token = generate_session_token();
        }

        let now = Utc::now();
        let session_model = SessionActiveModel {
            token: Set(token.clone()),
            owner_id: Set(owner_id),
            expires_at: Set(now + ttl),
            created_at: Set(now),
            user_agent: Set(metadata.user_agent),
            ip_address: Set(metadata.ip_address),
        };

        session_model.insert(&txn).await?;
        txn.commit().await?;

        Ok(token)
    }

    async fn lookup(&self, token: &str) -> AuthResult<Option<session::Model>> {
        Ok(SessionEntity::find_by_id(token.to_owned())
            .one(&self.conn)
            .await?)
    }

    async fn invalidate(&self, token: &str) -> AuthResult<()> {
        SessionEntity::delete_by_id(token.to_owned())
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    /// Executes a single bulk delete of every session with an expiry date in
    /// the past.
    async fn sweep_expired(&self) -> AuthResult<u64> {
        let result = SessionEntity::delete_many()
            .filter(session::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
