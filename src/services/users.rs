use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{hash_password, AuthUser};
use crate::db::DbPool;
use crate::entities::{user, User, UserModel};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Admin account management. Accounts are only ever created by an existing
/// admin, and nobody can delete their own account.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    events: EventSender,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<UserModel> for UserSummary {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

impl UserService {
    pub fn new(db: Arc<DbPool>, events: EventSender) -> Self {
        Self { db, events }
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<UserModel, ServiceError> {
        let email = email.trim().to_ascii_lowercase();
        if password.len() < 8 {
            return Err(ServiceError::ValidationError(
                "password must be at least 8 characters".to_string(),
            ));
        }

        let exists = User::find()
            .filter(user::Column::Email.eq(&email))
            .one(&*self.db)
            .await?
            .is_some();
        if exists {
            return Err(ServiceError::Conflict(format!(
                "user '{email}' already exists"
            )));
        }

        let now = Utc::now();
        let created = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(hash_password(&password)?),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;

        self.events
            .send_or_log(Event::UserRegistered(created.id))
            .await;
        info!(user_id = %created.id, "registered admin user");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<UserSummary>, ServiceError> {
        Ok(User::find()
            .order_by_asc(user::Column::Email)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(UserSummary::from)
            .collect())
    }

    /// Self-deletion is always rejected; machines owned by the deleted
    /// admin stay in the catalog under their recorded admin_id.
    #[instrument(skip(self))]
    pub async fn delete(&self, actor: &AuthUser, user_id: Uuid) -> Result<(), ServiceError> {
        if actor.user_id == user_id {
            return Err(ServiceError::Forbidden(
                "you cannot delete your own account".to_string(),
            ));
        }

        let result = User::delete_by_id(user_id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("User {user_id} not found")));
        }

        info!(%user_id, "deleted user");
        Ok(())
    }

    /// Seed path used at startup so a fresh deployment has one admin.
    pub async fn ensure_seed_admin(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(), ServiceError> {
        let existing = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?;
        if existing.is_none() {
            self.register(name.to_string(), email.to_string(), password.to_string())
                .await?;
        }
        Ok(())
    }
}
