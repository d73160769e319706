use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use serde::Deserialize;
use tracing::{info, instrument};

use models::status::ImportStatus;
use models::{import_history, user};

use crate::errors::ServiceError;
use crate::views::ImportRecordView;

pub const DEFAULT_HISTORY_LIMIT: u64 = 10;
pub const MAX_HISTORY_LIMIT: u64 = 100;

/// Missing limit falls back to the default; anything else is clamped to 1..=100.
pub fn normalize_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT)
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewImport {
    pub filename: String,
    pub user_id: Option<i32>,
    pub records_count: i32,
    pub status: String,
}

/// Most recent imports first, with the importing user's name when known.
#[instrument(skip(db))]
pub async fn list_import_history(
    db: &DatabaseConnection,
    limit: Option<u64>,
) -> Result<Vec<ImportRecordView>, ServiceError> {
    let rows = import_history::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(import_history::Column::ImportedAt)
        .order_by_desc(import_history::Column::Id)
        .limit(normalize_limit(limit))
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    Ok(rows.into_iter().map(|(record, importer)| ImportRecordView::from_row(record, importer)).collect())
}

#[instrument(skip_all, fields(filename = %input.filename))]
pub async fn record_import(
    db: &DatabaseConnection,
    input: NewImport,
    now: DateTime<Utc>,
) -> Result<import_history::Model, ServiceError> {
    let status = ImportStatus::from(input.status);
    let record =
        import_history::create(db, &input.filename, now.into(), input.user_id, input.records_count, &status).await?;
    info!(import_id = record.id, records = record.records_count, status = %record.status, "import_recorded");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_support::get_db;
    use crate::users::{create_user, NewUser};
    use chrono::Duration;

    fn new_import(filename: &str, user_id: Option<i32>, records: i32) -> NewImport {
        NewImport { filename: filename.into(), user_id, records_count: records, status: "success".into() }
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_limit(None), 10);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(25)), 25);
        assert_eq!(normalize_limit(Some(5000)), 100);
    }

    #[tokio::test]
    async fn newest_first_with_importer_name() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let anna = create_user(
            &db,
            NewUser { name: Some("Anna".into()), email: Some("anna@example.com".into()), ..Default::default() },
        )
        .await?;
        let start = Utc::now() - Duration::hours(3);
        record_import(&db, new_import("january.xlsx", Some(anna.id), 120), start).await?;
        record_import(&db, new_import("february.xlsx", None, 80), start + Duration::hours(1)).await?;
        record_import(&db, new_import("march.xlsx", Some(anna.id), 64), start + Duration::hours(2)).await?;

        let history = list_import_history(&db, None).await?;
        let files: Vec<_> = history.iter().map(|h| h.filename.as_str()).collect();
        assert_eq!(files, vec!["march.xlsx", "february.xlsx", "january.xlsx"]);
        assert_eq!(history[0].user.as_deref(), Some("Anna"));
        assert_eq!(history[1].user, None);
        assert_eq!(history[0].records, 64);

        let limited = list_import_history(&db, Some(2)).await?;
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].filename, "march.xlsx");
        Ok(())
    }

    #[tokio::test]
    async fn default_limit_caps_at_ten() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let start = Utc::now() - Duration::days(1);
        for i in 0..12 {
            record_import(&db, new_import(&format!("batch-{i:02}.csv"), None, i), start + Duration::minutes(i.into()))
                .await?;
        }
        let history = list_import_history(&db, None).await?;
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].filename, "batch-11.csv");
        Ok(())
    }

    #[tokio::test]
    async fn negative_record_count_is_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = record_import(&db, new_import("broken.csv", None, -5), Utc::now()).await;
        assert!(matches!(err, Err(ref e) if e.kind() == ErrorKind::Validation));
        assert!(list_import_history(&db, None).await?.is_empty());
        Ok(())
    }
}
