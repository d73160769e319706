use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::status::DeviceStatus;
use models::{fiscal_device, ofd_provider};

use crate::errors::ServiceError;
use crate::expiry::parse_expiry_date;
use crate::views::DeviceView;

/// Escape character for LIKE patterns built from user input.
const LIKE_ESCAPE: char = '!';

/// Status restriction for device listings. `"all"` (or nothing) means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("all") => StatusFilter::All,
            Some(status) => StatusFilter::Only(status.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub search: Option<String>,
    pub status: StatusFilter,
}

impl DeviceFilter {
    pub fn new(search: Option<&str>, status: Option<&str>) -> Self {
        Self {
            search: search.filter(|s| !s.is_empty()).map(str::to_string),
            status: StatusFilter::parse(status),
        }
    }
}

/// Payload of the `add_device` action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDevice {
    pub device_id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub ofd_provider_id: Option<i32>,
    pub expiry_date: Option<String>,
    pub status: Option<String>,
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ServiceError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::MissingField(field)),
    }
}

/// `%needle%` with LIKE metacharacters in the needle taken literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `ILIKE` "contains" over name, external id and location; Postgres folds any script.
fn search_condition(needle: &str) -> Condition {
    let pattern = contains_pattern(needle);
    [fiscal_device::Column::Name, fiscal_device::Column::DeviceId, fiscal_device::Column::Location]
        .into_iter()
        .fold(Condition::any(), |cond, column| {
            cond.add(Expr::col((fiscal_device::Entity, column)).ilike(LikeExpr::new(&pattern).escape(LIKE_ESCAPE)))
        })
}

/// Same match as [`search_condition`] for backends whose `LIKE` folds ASCII only.
fn matches_folded(device: &fiscal_device::Model, folded_needle: &str) -> bool {
    [Some(device.name.as_str()), Some(device.device_id.as_str()), device.location.as_deref()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(folded_needle))
}

/// List devices joined with their provider name, soonest expiry first.
#[instrument(skip_all, fields(search = ?filter.search, status = ?filter.status))]
pub async fn list_devices(
    db: &DatabaseConnection,
    filter: &DeviceFilter,
    now: DateTime<Utc>,
) -> Result<Vec<DeviceView>, ServiceError> {
    let in_store_search = db.get_database_backend() == DatabaseBackend::Postgres;
    let mut query = fiscal_device::Entity::find().find_also_related(ofd_provider::Entity);
    if let (Some(needle), true) = (filter.search.as_deref(), in_store_search) {
        query = query.filter(search_condition(needle));
    }
    if let StatusFilter::Only(status) = &filter.status {
        query = query.filter(fiscal_device::Column::Status.eq(status.as_str()));
    }
    let mut rows = query
        .order_by_asc(fiscal_device::Column::ExpiryDate)
        .order_by_asc(fiscal_device::Column::DeviceId)
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    if let (Some(needle), false) = (filter.search.as_deref(), in_store_search) {
        let folded = needle.to_lowercase();
        rows.retain(|(device, _)| matches_folded(device, &folded));
    }
    Ok(rows.into_iter().map(|(device, provider)| DeviceView::from_row(device, provider, now)).collect())
}

/// Get a device by its external identifier.
pub async fn get_device(db: &DatabaseConnection, device_id: &str) -> Result<Option<fiscal_device::Model>, ServiceError> {
    fiscal_device::Entity::find()
        .filter(fiscal_device::Column::DeviceId.eq(device_id))
        .one(db)
        .await
        .map_err(ServiceError::db)
}

/// Insert one device. The unique index on `device_id` decides duplicates.
#[instrument(skip_all, fields(device_id = ?input.device_id))]
pub async fn create_device(
    db: &DatabaseConnection,
    input: NewDevice,
    now: DateTime<Utc>,
) -> Result<fiscal_device::Model, ServiceError> {
    let device_id = required(input.device_id.as_deref(), "device_id")?;
    let name = required(input.name.as_deref(), "name")?;
    let expiry_raw = required(input.expiry_date.as_deref(), "expiry_date")?;
    fiscal_device::validate_device_id(device_id)?;
    let expiry_date = parse_expiry_date(expiry_raw)?;
    let status = input
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(DeviceStatus::from)
        .unwrap_or_default();

    let am = fiscal_device::ActiveModel {
        device_id: Set(device_id.to_string()),
        name: Set(name.to_string()),
        location: Set(Some(input.location.unwrap_or_default())),
        ofd_provider_id: Set(input.ofd_provider_id),
        expiry_date: Set(expiry_date),
        status: Set(status.as_str().to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    match am.insert(db).await {
        Ok(created) => {
            info!(device_id = %created.device_id, status = %created.status, "device_created");
            Ok(created)
        }
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(ServiceError::DuplicateDevice(device_id.to_string())),
            _ => Err(ServiceError::db(e)),
        },
    }
}

/// Set a device's status and refresh `updated_at` in one statement.
#[instrument(skip(db, now))]
pub async fn update_device_status(
    db: &DatabaseConnection,
    device_id: &str,
    status: &str,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    let device_id = required(Some(device_id), "device_id")?;
    fiscal_device::validate_status(status)?;
    let status = DeviceStatus::from(status.trim());
    let res = fiscal_device::Entity::update_many()
        .col_expr(fiscal_device::Column::Status, Expr::value(status.as_str()))
        .col_expr(fiscal_device::Column::UpdatedAt, Expr::value(DateTimeWithTimeZone::from(now)))
        .filter(fiscal_device::Column::DeviceId.eq(device_id))
        .exec(db)
        .await
        .map_err(ServiceError::db)?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found(&format!("device {device_id}")));
    }
    info!(%device_id, status = %status, known = status.is_known(), "device_status_updated");
    Ok(())
}
