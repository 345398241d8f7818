use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{app_setting, AppSetting};
use crate::errors::ServiceError;

/// Key/value configuration repository. Mutable runtime settings (SMTP
/// delivery, notification recipient) live here rather than in the static
/// process configuration.
#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DbPool>,
}

/// SMTP configuration exposed on the admin settings endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SmtpSettings {
    pub host: Option<String>,
    pub port: Option<String>,
    pub username: Option<String>,
    pub sender: Option<String>,
    pub recipient: Option<String>,
}

const SMTP_KEYS: [(&str, fn(&SmtpSettings) -> &Option<String>); 5] = [
    ("smtp.host", |s| &s.host),
    ("smtp.port", |s| &s.port),
    ("smtp.username", |s| &s.username),
    ("smtp.sender", |s| &s.sender),
    ("smtp.recipient", |s| &s.recipient),
];

impl SettingsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(AppSetting::find()
            .filter(app_setting::Column::Key.eq(key))
            .one(&*self.db)
            .await?
            .map(|row| row.value))
    }

    #[instrument(skip(self, value))]
    pub async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        AppSetting::insert(app_setting::ActiveModel {
            id: Set(Uuid::new_v4()),
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(app_setting::Column::Key)
                .update_columns([app_setting::Column::Value, app_setting::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(&*self.db)
        .await?;

        Ok(())
    }

    /// Read the SMTP key set as one struct; absent keys stay None.
    pub async fn smtp_settings(&self) -> Result<SmtpSettings, ServiceError> {
        let mut settings = SmtpSettings::default();
        for (key, _) in SMTP_KEYS {
            let value = self.get(key).await?;
            match key {
                "smtp.host" => settings.host = value,
                "smtp.port" => settings.port = value,
                "smtp.username" => settings.username = value,
                "smtp.sender" => settings.sender = value,
                "smtp.recipient" => settings.recipient = value,
                _ => {}
            }
        }
        Ok(settings)
    }

    /// Upsert the provided SMTP keys; None fields are left untouched.
    pub async fn update_smtp_settings(
        &self,
        settings: &SmtpSettings,
    ) -> Result<SmtpSettings, ServiceError> {
        for (key, accessor) in SMTP_KEYS {
            if let Some(value) = accessor(settings) {
                self.set(key, value.clone()).await?;
            }
        }
        self.smtp_settings().await
    }
}
