//! Principal entity: an admin or end user able to hold sessions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of roles a principal can be assigned.
///
/// Stored as a short string so the column stays readable in both Postgres
/// and SQLite.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "moderator")]
    Moderator,
    #[sea_orm(string_value = "content_manager")]
    ContentManager,
    #[sea_orm(string_value = "user")]
    User,
}

impl Role {
    /// Roles allowed to run maintenance actions such as the session sweep.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::ContentManager => "content_manager",
            Role::User => "user",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            "content_manager" => Ok(Role::ContentManager),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sea-ORM entity model for the `principal` table.
///
/// Principals are created out-of-band (the startup seed) and are only
/// mutated here on successful login, when `last_login` is refreshed and
/// `login_count` incremented.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "principal")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Login identifier, unique across principals.
    #[sea_orm(unique, column_type = "Text")]
    pub email: String,

    /// Display name.
    #[sea_orm(column_type = "Text")]
    pub name: String,

    /// Argon2id hash in PHC string format.
    #[sea_orm(column_type = "Text")]
    pub password_hash: String,

    pub role: Role,

    pub last_login: Option<DateTimeUtc>,

    pub login_count: i32,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_dashed_and_cased_names() {
        assert_eq!("super-admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("Content_Manager".parse::<Role>().unwrap(), Role::ContentManager);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn only_admin_roles_are_admin() {
        assert!(Role::SuperAdmin.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Moderator.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn role_serializes_as_snake_case() {
        let json = serde_json::to_string(&Role::ContentManager).unwrap();
        assert_eq!(json, "\"content_manager\"");
    }
}
