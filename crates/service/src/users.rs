use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Deserialize;
use tracing::{info, instrument};

use models::status::UserRole;
use models::user;

use crate::errors::ServiceError;
use crate::views::UserView;

const DEFAULT_USER_STATUS: &str = "offline";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

#[instrument(skip_all)]
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<UserView>, ServiceError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    Ok(users.into_iter().map(UserView::from).collect())
}

#[instrument(skip_all, fields(email = ?input.email))]
pub async fn create_user(db: &DatabaseConnection, input: NewUser) -> Result<user::Model, ServiceError> {
    let name = input.name.as_deref().ok_or(ServiceError::MissingField("name"))?;
    let email = input.email.as_deref().ok_or(ServiceError::MissingField("email"))?;
    let role = input.role.as_deref().map(UserRole::from).unwrap_or(UserRole::Viewer);
    let status = input.status.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(DEFAULT_USER_STATUS);

    let created = user::create(db, name, email, &role, status).await?;
    info!(user_id = created.id, role = %created.role, "user_created");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use models::errors::ModelError;
    use crate::test_support::get_db;

    fn new_user(name: &str, email: &str, role: &str) -> NewUser {
        NewUser { name: Some(name.into()), email: Some(email.into()), role: Some(role.into()), status: None }
    }

    #[tokio::test]
    async fn lists_users_in_id_order() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_user(&db, new_user("Anna", "anna@example.com", "admin")).await?;
        create_user(&db, new_user("Boris", "boris@example.com", "manager")).await?;

        let users = list_users(&db).await?;
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Anna", "Boris"]);
        assert!(users[0].id < users[1].id);
        assert_eq!(users[1].role, "manager");
        assert_eq!(users[0].status, "offline");
        assert!(users[0].last_active.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn rejects_bad_email_and_missing_name() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let bad = create_user(&db, new_user("Anna", "anna.example.com", "viewer")).await;
        assert!(matches!(bad, Err(ref e) if e.kind() == ErrorKind::Validation));

        let missing = create_user(&db, NewUser { email: Some("x@example.com".into()), ..Default::default() }).await;
        assert!(matches!(missing, Err(ServiceError::MissingField("name"))));
        assert!(list_users(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_a_store_failure() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_user(&db, new_user("Anna", "anna@example.com", "admin")).await?;
        let dup = create_user(&db, new_user("Anna 2", "anna@example.com", "viewer")).await;
        assert!(matches!(dup, Err(ServiceError::Model(ModelError::Db(_)))));
        assert_eq!(list_users(&db).await?.len(), 1);
        Ok(())
    }
}
