#![cfg(test)]
use chrono::{DateTime, Duration, NaiveDate, Utc};
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use models::db::connect_with_config;
use models::ofd_provider;
use models::status::ProviderStatus;

use crate::devices::NewDevice;
use crate::expiry::render_date;

/// Fresh migrated SQLite database in its own file, so tests never share rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let dir = std::env::temp_dir().join("fiscal_tracker_tests");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.db", uuid::Uuid::new_v4()));
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 5,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// UTC calendar date `days` after `now`.
pub fn date_in(now: DateTime<Utc>, days: i64) -> NaiveDate {
    now.date_naive() + Duration::days(days)
}

pub fn new_device(device_id: &str, name: &str, location: &str, expiry: NaiveDate) -> NewDevice {
    NewDevice {
        device_id: Some(device_id.to_string()),
        name: Some(name.to_string()),
        location: Some(location.to_string()),
        ofd_provider_id: None,
        expiry_date: Some(render_date(expiry)),
        status: None,
    }
}

pub async fn seed_provider(
    db: &DatabaseConnection,
    name: &str,
    status: ProviderStatus,
    expiry: NaiveDate,
) -> Result<ofd_provider::Model, anyhow::Error> {
    Ok(ofd_provider::create(db, name, None, expiry, &status).await?)
}
