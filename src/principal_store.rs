//! Sea-ORM access to principal records.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, Value};

use crate::entity::principal::{
    self, ActiveModel as PrincipalActiveModel, Entity as PrincipalEntity, Role,
};
use crate::error::{AuthError, AuthResult};

/// Fields needed to create or refresh a principal.
#[derive(Debug, Clone)]
pub struct UpsertPrincipal {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct PrincipalStore {
    conn: DatabaseConnection,
}

impl PrincipalStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_email(&self, email: &str) -> AuthResult<Option<principal::Model>> {
        Ok(PrincipalEntity::find()
            .filter(principal::Column::Email.eq(email))
            .one(&self.conn)
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> AuthResult<Option<principal::Model>> {
        Ok(PrincipalEntity::find_by_id(id).one(&self.conn).await?)
    }

    /// Inserts the principal, or refreshes name, role and password hash of
    /// the existing row with the same email. Login statistics are preserved.
    pub async fn upsert(&self, input: UpsertPrincipal) -> AuthResult<principal::Model> {
        let model = PrincipalActiveModel {
            email: Set(input.email.clone()),
            name: Set(input.name),
            password_hash: Set(input.password_hash),
            role: Set(input.role),
            last_login: Set(None),
            login_count: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        PrincipalEntity::insert(model)
            .on_conflict(
                OnConflict::column(principal::Column::Email)
                    .update_columns([
                        principal::Column::Name,
                        principal::Column::PasswordHash,
                        principal::Column::Role,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        self.find_by_email(&input.email)
            .await?
            .ok_or(AuthError::NotFound("User"))
    }

    /// Stamps a successful login.
    ///
    /// The counter is incremented by a single `UPDATE ... SET login_count =
    /// login_count + 1`, so concurrent logins never lose an increment.
    pub async fn record_login(&self, id: i32, at: DateTime<Utc>) -> AuthResult<()> {
        PrincipalEntity::update_many()
            .col_expr(
                principal::Column::LoginCount,
                Expr::col(principal::Column::LoginCount).add(1),
            )
            .col_expr(principal::Column::LastLogin, Expr::value(Value::from(at)))
            .filter(principal::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}
