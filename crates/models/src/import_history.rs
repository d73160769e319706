use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::{errors, user};
use crate::status::ImportStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "import_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub filename: String,
    pub imported_at: DateTimeWithTimeZone,
    pub user_id: Option<i32>,
    pub records_count: i32,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    filename: &str,
    imported_at: DateTimeWithTimeZone,
    user_id: Option<i32>,
    records_count: i32,
    status: &ImportStatus,
) -> Result<Model, errors::ModelError> {
    if filename.trim().is_empty() {
        return Err(errors::ModelError::Validation("filename required".into()));
    }
    if records_count < 0 {
        return Err(errors::ModelError::Validation("records_count must not be negative".into()));
    }
    let am = ActiveModel {
        filename: Set(filename.trim().to_string()),
        imported_at: Set(imported_at),
        user_id: Set(user_id),
        records_count: Set(records_count),
        status: Set(status.as_str().to_string()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
