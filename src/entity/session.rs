//! Session entity model for Sea-ORM database interaction.
//!
//! This module defines the database schema representation for login sessions.
//! Each row binds an opaque token to the principal that logged in and to an
//! absolute expiry timestamp.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing a login session in the database.
///
/// # Database Schema
///
/// | Column      | Type                    | Description                          |
/// |-------------|-------------------------|--------------------------------------|
/// | token       | TEXT (Primary Key)      | Opaque session token                 |
/// | owner_id    | INTEGER                 | Principal that owns the session      |
/// | expires_at  | TIMESTAMPTZ             | Session expiration timestamp         |
/// | created_at  | TIMESTAMPTZ             | Creation timestamp                   |
/// | user_agent  | TEXT NULL               | `User-Agent` captured at login       |
/// | ip_address  | TEXT NULL               | Client address captured at login     |
///
/// The request metadata columns are informational only. They are never used
/// to bind or validate a session.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "session")]
pub struct Model {
    /// The opaque session token.
    ///
    /// Serves as the primary key, so at most one row per token can exist.
    /// Clients must treat its contents as opaque.
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub token: String,

    /// Id of the [`principal`](super::principal) that logged in.
    pub owner_id: i32,

    /// The session expiration timestamp.
    ///
    /// A session whose `expires_at` is in the past is treated as absent and
    /// is removed either on its next lookup or by the expired-session sweep.
    pub expires_at: DateTimeUtc,

    /// When the session was issued.
    pub created_at: DateTimeUtc,

    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub ip_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::principal::Entity",
        from = "Column::OwnerId",
        to = "super::principal::Column::Id",
        on_delete = "Cascade"
    )]
    Principal,
}

impl Related<super::principal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Principal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the session expired strictly before `now`.
    pub fn is_expired_at(&self, now: DateTimeUtc) -> bool {
        self.expires_at < now
    }
}
