//! Migrator registering the tracker tables in dependency order.
//! Indexes are applied last.
//!
//! Production deployments own their schema; this migrator bootstraps
//! development databases and the throwaway stores used by tests.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_ofd_provider;
mod m20240101_000002_create_fiscal_device;
mod m20240101_000003_create_user;
mod m20240101_000004_create_import_history;
mod m20240101_000005_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_ofd_provider::Migration),
            Box::new(m20240101_000002_create_fiscal_device::Migration),
            Box::new(m20240101_000003_create_user::Migration),
            Box::new(m20240101_000004_create_import_history::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000005_add_indexes::Migration),
        ]
    }
}
