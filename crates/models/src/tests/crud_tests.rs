use crate::db::connect_with_config;
use crate::status::{DeviceStatus, ImportStatus, ProviderStatus, UserRole};
use crate::{errors::ModelError, fiscal_device, import_history, ofd_provider, user};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};

/// Setup an in-memory test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[tokio::test]
async fn test_provider_create_and_status() -> Result<()> {
    let db = setup_test_db().await?;

    let p = ofd_provider::create(&db, "  OFD.ru ", Some("C-1001"), date(2026, 3, 1), &ProviderStatus::Active).await?;
    assert_eq!(p.name, "OFD.ru");
    assert_eq!(p.contract_number.as_deref(), Some("C-1001"));
    assert_eq!(p.status, ProviderStatus::Active.as_str());

    let found = ofd_provider::Entity::find_by_id(p.id).one(&db).await?;
    assert_eq!(found.map(|f| f.expiry_date), Some(date(2026, 3, 1)));

    let err = ofd_provider::create(&db, " ", None, date(2026, 3, 1), &ProviderStatus::Active).await;
    assert!(matches!(err, Err(ModelError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn test_device_belongs_to_provider() -> Result<()> {
    let db = setup_test_db().await?;
    let p = ofd_provider::create(&db, "Taxcom", None, date(2026, 6, 1), &ProviderStatus::Expiring).await?;

    let now = Utc::now();
    let d = fiscal_device::ActiveModel {
        device_id: Set("FN-0001".into()),
        name: Set("Till 1".into()),
        location: Set(Some("Moscow".into())),
        ofd_provider_id: Set(Some(p.id)),
        expiry_date: Set(date(2026, 12, 31)),
        status: Set(DeviceStatus::Billed.as_str().into()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    assert_eq!(d.device_status(), DeviceStatus::Billed);

    let provider = d.find_related(ofd_provider::Entity).one(&db).await?;
    assert_eq!(provider.map(|p| p.name), Some("Taxcom".to_string()));

    let devices = p.find_related(fiscal_device::Entity).all(&db).await?;
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].device_id, "FN-0001");
    Ok(())
}

#[tokio::test]
async fn test_user_validation_and_import_relation() -> Result<()> {
    let db = setup_test_db().await?;

    assert!(matches!(
        user::create(&db, "Anna", "not-an-email", &UserRole::Admin, "online").await,
        Err(ModelError::Validation(_))
    ));

    let u = user::create(&db, "Anna", "anna@example.com", &UserRole::Admin, "online").await?;
    assert_eq!(u.role, "admin");
    assert!(u.last_active.is_none());

    let rec = import_history::create(&db, "devices.xlsx", Utc::now().into(), Some(u.id), 42, &ImportStatus::Success).await?;
    let owner = rec.find_related(user::Entity).one(&db).await?;
    assert_eq!(owner.map(|o| o.email), Some("anna@example.com".to_string()));

    assert!(matches!(
        import_history::create(&db, "x.csv", Utc::now().into(), None, -1, &ImportStatus::Failed).await,
        Err(ModelError::Validation(_))
    ));
    Ok(())
}

#[test]
fn test_device_id_validation() {
    assert!(fiscal_device::validate_device_id("FN-1").is_ok());
    assert!(fiscal_device::validate_device_id("   ").is_err());
    assert!(fiscal_device::validate_device_id(&"9".repeat(fiscal_device::DEVICE_ID_MAX_LEN + 1)).is_err());
    assert!(fiscal_device::validate_status("").is_err());
}
