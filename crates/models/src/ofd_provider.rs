use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors, fiscal_device};
use crate::status::ProviderStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ofd_providers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub contract_number: Option<String>,
    pub expiry_date: Date,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { FiscalDevice }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::FiscalDevice => Entity::has_many(fiscal_device::Entity).into(),
        }
    }
}

impl Related<fiscal_device::Entity> for Entity {
    fn to() -> RelationDef { Relation::FiscalDevice.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("provider name required".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    contract_number: Option<&str>,
    expiry_date: NaiveDate,
    status: &ProviderStatus,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    let am = ActiveModel {
        name: Set(name.trim().to_string()),
        contract_number: Set(contract_number.map(str::to_string)),
        expiry_date: Set(expiry_date),
        status: Set(status.as_str().to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
