use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Principal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Principal::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Principal::Email).text().not_null().unique_key())
                    .col(ColumnDef::new(Principal::Name).text().not_null())
                    .col(ColumnDef::new(Principal::PasswordHash).text().not_null())
                    .col(ColumnDef::new(Principal::Role).string_len(32).not_null())
                    .col(ColumnDef::new(Principal::LastLogin).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Principal::LoginCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Principal::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Principal::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Principal {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    Role,
    LastLogin,
    LoginCount,
    CreatedAt,
}
