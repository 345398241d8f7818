use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{contact_submission, ContactSubmission, ContactSubmissionModel};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::notifications::{EmailMessage, Notifier};
use crate::services::settings::SettingsService;

/// Quote-form intake and admin triage of the resulting leads.
#[derive(Clone)]
pub struct ContactService {
    db: Arc<DbPool>,
    notifier: Arc<dyn Notifier>,
    settings: SettingsService,
    events: EventSender,
}

#[derive(Debug, Clone)]
pub struct QuoteInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactService {
    pub fn new(
        db: Arc<DbPool>,
        notifier: Arc<dyn Notifier>,
        settings: SettingsService,
        events: EventSender,
    ) -> Self {
        Self {
            db,
            notifier,
            settings,
            events,
        }
    }

    /// Persist the lead and fire the notification email. Delivery is
    /// best-effort: the submission succeeds even when the email does not.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn submit(&self, input: QuoteInput) -> Result<ContactSubmissionModel, ServiceError> {
        let submission = contact_submission::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            message: Set(input.message),
            read: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        self.notify(&submission).await;

        self.events
            .send_or_log(Event::QuoteSubmitted(submission.id))
            .await;
        info!(submission_id = %submission.id, "quote submitted");
        Ok(submission)
    }

    async fn notify(&self, submission: &ContactSubmissionModel) {
        let recipient = match self.settings.get("smtp.recipient").await {
            Ok(Some(value)) => value,
            Ok(None) => {
                warn!("no notification recipient configured, skipping email");
                return;
            }
            Err(e) => {
                warn!("could not load notification recipient: {e}");
                return;
            }
        };

        let message = EmailMessage {
            to: recipient,
            subject: format!("New quote request from {}", submission.name),
            body: format!(
                "{} <{}>{}\n\n{}",
                submission.name,
                submission.email,
                submission
                    .phone
                    .as_deref()
                    .map(|p| format!(", tel. {p}"))
                    .unwrap_or_default(),
                submission.message
            ),
        };

        if let Err(e) = self.notifier.send(&message).await {
            warn!(submission_id = %submission.id, "quote notification failed: {e}");
        }
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ContactSubmissionModel>, ServiceError> {
        ContactSubmission::find()
            .order_by_desc(contact_submission::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn set_read(
        &self,
        submission_id: Uuid,
        read: bool,
    ) -> Result<ContactSubmissionModel, ServiceError> {
        let submission = ContactSubmission::find_by_id(submission_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Contact submission {submission_id} not found"))
            })?;

        let mut active: contact_submission::ActiveModel = submission.into();
        active.read = Set(read);
        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, submission_id: Uuid) -> Result<(), ServiceError> {
        let result = ContactSubmission::delete_by_id(submission_id)
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Contact submission {submission_id} not found"
            )));
        }

        Ok(())
    }
}
