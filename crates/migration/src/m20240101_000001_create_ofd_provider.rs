//! Create `ofd_providers` table.
//!
//! Fiscal-data operators with their own contract expiry dates.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OfdProvider::Table)
                    .if_not_exists()
                    .col(integer(OfdProvider::Id).primary_key().auto_increment())
                    .col(string_len(OfdProvider::Name, 255).not_null())
                    .col(
                        ColumnDef::new(OfdProvider::ContractNumber)
                            .string_len(128)
                            .null(),
                    )
                    .col(date(OfdProvider::ExpiryDate).not_null())
                    .col(string_len(OfdProvider::Status, 32).not_null())
                    .col(timestamp_with_time_zone(OfdProvider::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OfdProvider::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OfdProvider {
    #[sea_orm(iden = "ofd_providers")]
    Table,
    Id,
    Name,
    ContractNumber,
    ExpiryDate,
    Status,
    CreatedAt,
}
