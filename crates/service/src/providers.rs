use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect, RelationTrait};
use serde::Deserialize;
use tracing::{info, instrument};

use models::status::ProviderStatus;
use models::{fiscal_device, ofd_provider};

use crate::errors::ServiceError;
use crate::expiry::{days_left, parse_expiry_date, render_date};
use crate::views::ProviderView;

/// Provider columns plus the number of devices pointing at it.
#[derive(Debug, FromQueryResult)]
struct ProviderRow {
    id: i32,
    name: String,
    contract_number: Option<String>,
    expiry_date: NaiveDate,
    status: String,
    devices_count: i64,
}

impl ProviderRow {
    fn into_view(self, now: DateTime<Utc>) -> ProviderView {
        ProviderView {
            id: self.id,
            days_left: days_left(self.expiry_date, now),
            expiry_date: render_date(self.expiry_date),
            name: self.name,
            contract_number: self.contract_number,
            devices_count: self.devices_count,
            status: ProviderStatus::from(self.status),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProvider {
    pub name: Option<String>,
    pub contract_number: Option<String>,
    pub expiry_date: Option<String>,
    pub status: Option<String>,
}

/// All providers with their device counts, soonest contract expiry first.
#[instrument(skip_all)]
pub async fn list_providers(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<Vec<ProviderView>, ServiceError> {
    use ofd_provider::Column as P;

    let rows = ofd_provider::Entity::find()
        .select_only()
        .columns([P::Id, P::Name, P::ContractNumber, P::ExpiryDate, P::Status])
        .column_as(Expr::col((fiscal_device::Entity, fiscal_device::Column::Id)).count(), "devices_count")
        .join(JoinType::LeftJoin, ofd_provider::Relation::FiscalDevice.def())
        .group_by(P::Id)
        .group_by(P::Name)
        .group_by(P::ContractNumber)
        .group_by(P::ExpiryDate)
        .group_by(P::Status)
        .order_by_asc(P::ExpiryDate)
        .order_by_asc(P::Id)
        .into_model::<ProviderRow>()
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    Ok(rows.into_iter().map(|row| row.into_view(now)).collect())
}

#[instrument(skip_all, fields(name = ?input.name))]
pub async fn create_provider(db: &DatabaseConnection, input: NewProvider) -> Result<ofd_provider::Model, ServiceError> {
    let name = input.name.as_deref().map(str::trim).filter(|s| !s.is_empty()).ok_or(ServiceError::MissingField("name"))?;
    let expiry_raw = input
        .expiry_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(ServiceError::MissingField("expiry_date"))?;
    let expiry_date = parse_expiry_date(expiry_raw)?;
    let status = input.status.as_deref().map(ProviderStatus::from).unwrap_or(ProviderStatus::Active);
    let contract = input.contract_number.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let created = ofd_provider::create(db, name, contract, expiry_date, &status).await?;
    info!(provider_id = created.id, status = %created.status, "provider_created");
    Ok(created)
}
