//! Create `fiscal_devices` table with optional FK to `ofd_providers`.
//!
//! `device_id` is the external identifier and must be unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FiscalDevice::Table)
                    .if_not_exists()
                    .col(integer(FiscalDevice::Id).primary_key().auto_increment())
                    .col(string_len(FiscalDevice::DeviceId, 64).unique_key().not_null())
                    .col(string_len(FiscalDevice::Name, 255).not_null())
                    .col(
                        ColumnDef::new(FiscalDevice::Location)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FiscalDevice::OfdProviderId)
                            .integer()
                            .null(),
                    )
                    .col(date(FiscalDevice::ExpiryDate).not_null())
                    .col(string_len(FiscalDevice::Status, 32).not_null())
                    .col(timestamp_with_time_zone(FiscalDevice::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(FiscalDevice::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fiscal_device_ofd_provider")
                            .from(FiscalDevice::Table, FiscalDevice::OfdProviderId)
                            .to(OfdProvider::Table, OfdProvider::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FiscalDevice::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FiscalDevice {
    #[sea_orm(iden = "fiscal_devices")]
    Table,
    Id,
    DeviceId,
    Name,
    Location,
    OfdProviderId,
    ExpiryDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OfdProvider {
    #[sea_orm(iden = "ofd_providers")]
    Table,
    Id,
}
