use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, ofd_provider};
use crate::status::DeviceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fiscal_devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub device_id: String,
    pub name: String,
    pub location: Option<String>,
    pub ofd_provider_id: Option<i32>,
    pub expiry_date: Date,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { OfdProvider }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::OfdProvider => Entity::belongs_to(ofd_provider::Entity)
                .from(Column::OfdProviderId)
                .to(ofd_provider::Column::Id)
                .into(),
        }
    }
}

impl Related<ofd_provider::Entity> for Entity {
    fn to() -> RelationDef { Relation::OfdProvider.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn device_status(&self) -> DeviceStatus { DeviceStatus::from(self.status.as_str()) }
}

/// Longest external identifier the schema accepts.
pub const DEVICE_ID_MAX_LEN: usize = 64;

pub fn validate_device_id(device_id: &str) -> Result<(), errors::ModelError> {
    let trimmed = device_id.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("device_id required".into()));
    }
    if trimmed.chars().count() > DEVICE_ID_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("device_id longer than {DEVICE_ID_MAX_LEN} characters")));
    }
    Ok(())
}

pub fn validate_status(status: &str) -> Result<(), errors::ModelError> {
    if status.trim().is_empty() {
        return Err(errors::ModelError::Validation("status required".into()));
    }
    Ok(())
}
