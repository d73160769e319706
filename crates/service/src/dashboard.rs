//! Overview figures for the landing page.
//!
//! All five queries share one cutoff derived from the caller's `now` and run
//! concurrently on the pool.

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::{debug, instrument};

use models::status::{DeviceStatus, ProviderStatus};
use models::{fiscal_device, ofd_provider};

use crate::errors::ServiceError;
use crate::expiry::expiring_cutoff;
use crate::views::{DashboardStats, DashboardView, ExpiringDeviceView};

/// Rows shown in the expiring-devices preview.
pub const PREVIEW_LIMIT: u64 = 4;

#[instrument(skip_all)]
pub async fn dashboard(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<DashboardView, ServiceError> {
    let cutoff = expiring_cutoff(now);
    let expiring = fiscal_device::Column::ExpiryDate.lte(cutoff);

    let total = fiscal_device::Entity::find().count(db);
    let expiring_soon = fiscal_device::Entity::find().filter(expiring.clone()).count(db);
    let active_ofd = ofd_provider::Entity::find()
        .filter(ofd_provider::Column::Status.eq(ProviderStatus::Active.as_str()))
        .count(db);
    let billed = fiscal_device::Entity::find()
        .filter(fiscal_device::Column::Status.eq(DeviceStatus::Billed.as_str()))
        .count(db);
    let preview = fiscal_device::Entity::find()
        .find_also_related(ofd_provider::Entity)
        .filter(expiring)
        .order_by_asc(fiscal_device::Column::ExpiryDate)
        .order_by_asc(fiscal_device::Column::DeviceId)
        .limit(PREVIEW_LIMIT)
        .all(db);

    let (total_devices, expiring_soon, active_ofd, billed_count, preview) =
        tokio::try_join!(total, expiring_soon, active_ofd, billed, preview).map_err(ServiceError::db)?;
    debug!(total_devices, expiring_soon, active_ofd, billed_count, %cutoff, "dashboard_computed");

    Ok(DashboardView {
        stats: DashboardStats { total_devices, expiring_soon, active_ofd, billed_count },
        expiring_devices: preview
            .into_iter()
            .map(|(device, provider)| ExpiringDeviceView::from_row(device, provider, now))
            .collect(),
    })
}
