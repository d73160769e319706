use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Devices: list and dashboard queries order/filter by expiry
        manager
            .create_index(
                Index::create()
                    .name("idx_fiscal_device_expiry")
                    .table(FiscalDevice::Table)
                    .col(FiscalDevice::ExpiryDate)
                    .to_owned(),
            )
            .await?;

        // Devices: provider join and per-provider counts
        manager
            .create_index(
                Index::create()
                    .name("idx_fiscal_device_provider")
                    .table(FiscalDevice::Table)
                    .col(FiscalDevice::OfdProviderId)
                    .to_owned(),
            )
            .await?;

        // ImportHistory: newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_import_history_imported_at")
                    .table(ImportHistory::Table)
                    .col(ImportHistory::ImportedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_import_history_imported_at").table(ImportHistory::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_fiscal_device_provider").table(FiscalDevice::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_fiscal_device_expiry").table(FiscalDevice::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum FiscalDevice {
    #[sea_orm(iden = "fiscal_devices")]
    Table,
    ExpiryDate,
    OfdProviderId,
}

#[derive(DeriveIden)]
enum ImportHistory {
    Table,
    ImportedAt,
}
