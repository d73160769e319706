//! Create `import_history` table with optional FK to `users`.
//!
//! Append-only audit of spreadsheet imports.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ImportHistory::Table)
                    .if_not_exists()
                    .col(integer(ImportHistory::Id).primary_key().auto_increment())
                    .col(string_len(ImportHistory::Filename, 255).not_null())
                    .col(timestamp_with_time_zone(ImportHistory::ImportedAt).not_null())
                    .col(
                        ColumnDef::new(ImportHistory::UserId)
                            .integer()
                            .null(),
                    )
                    .col(integer(ImportHistory::RecordsCount).not_null())
                    .col(string_len(ImportHistory::Status, 32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_import_history_user")
                            .from(ImportHistory::Table, ImportHistory::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ImportHistory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ImportHistory {
    Table,
    Id,
    Filename,
    ImportedAt,
    UserId,
    RecordsCount,
    Status,
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}
