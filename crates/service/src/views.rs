//! Display records returned to callers.
//!
//! Field names serialize in camelCase and are part of the public response
//! contract. `id` is always the natural external key of the resource.

use chrono::{DateTime, Utc};
use serde::Serialize;

use models::status::{DeviceStatus, ProviderStatus};
use models::{fiscal_device, import_history, ofd_provider, user};

use crate::expiry::{days_left, render_date, render_timestamp};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceView {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub ofd: Option<String>,
    pub expiry_date: String,
    pub days_left: i64,
    pub status: DeviceStatus,
}

impl DeviceView {
    pub fn from_row(device: fiscal_device::Model, provider: Option<ofd_provider::Model>, now: DateTime<Utc>) -> Self {
        Self {
            days_left: days_left(device.expiry_date, now),
            expiry_date: render_date(device.expiry_date),
            status: device.device_status(),
            id: device.device_id,
            name: device.name,
            location: device.location,
            ofd: provider.map(|p| p.name),
        }
    }
}

/// Compact row for the dashboard preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringDeviceView {
    pub id: String,
    pub name: String,
    pub ofd: Option<String>,
    pub days_left: i64,
    pub status: DeviceStatus,
}

impl ExpiringDeviceView {
    pub fn from_row(device: fiscal_device::Model, provider: Option<ofd_provider::Model>, now: DateTime<Utc>) -> Self {
        Self {
            days_left: days_left(device.expiry_date, now),
            status: device.device_status(),
            id: device.device_id,
            name: device.name,
            ofd: provider.map(|p| p.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderView {
    pub id: i32,
    pub name: String,
    pub contract_number: Option<String>,
    pub expiry_date: String,
    pub days_left: i64,
    pub devices_count: i64,
    pub status: ProviderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub last_active: Option<String>,
}

impl From<user::Model> for UserView {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            status: u.status,
            last_active: u.last_active.as_ref().map(render_timestamp),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecordView {
    pub id: i32,
    pub filename: String,
    pub date: String,
    pub user: Option<String>,
    pub records: i32,
    pub status: String,
}

impl ImportRecordView {
    pub fn from_row(record: import_history::Model, importer: Option<user::Model>) -> Self {
        Self {
            id: record.id,
            date: render_timestamp(&record.imported_at),
            filename: record.filename,
            user: importer.map(|u| u.name),
            records: record.records_count,
            status: record.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_devices: u64,
    pub expiring_soon: u64,
    pub active_ofd: u64,
    pub billed_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub expiring_devices: Vec<ExpiringDeviceView>,
}
