//! Outbound email notification.
//!
//! Mail delivery is an external collaborator behind the [`Notifier`]
//! trait: the production implementation posts to an HTTP mail API, tests
//! and unconfigured deployments use the no-op. Callers treat delivery as
//! best-effort; a failed notification is logged, never surfaced.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), ServiceError>;
}

/// Posts messages to an HTTP mail API (SendGrid-style endpoint).
pub struct MailApiNotifier {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl MailApiNotifier {
    pub fn new(endpoint: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            endpoint,
            token,
        }
    }
}

#[async_trait]
impl Notifier for MailApiNotifier {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: &EmailMessage) -> Result<(), ServiceError> {
        let mut request = self.client.post(&self.endpoint).json(message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("mail API unreachable: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "mail API returned {}",
                response.status()
            )));
        }

        info!("notification email accepted");
        Ok(())
    }
}

/// Used when no mail endpoint is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), ServiceError> {
        warn!(to = %message.to, "mail delivery not configured, dropping notification");
        Ok(())
    }
}
