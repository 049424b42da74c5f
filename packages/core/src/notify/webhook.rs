//! Webhook reminder delivery.
//!
//! POSTs each fired [`ReminderAlert`] as JSON to a configured URL. A single
//! attempt is made; failures are returned to the scheduler, which logs them.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::NotifyError;
use crate::notify::notifier::{Notifier, ReminderAlert};

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    http: Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn deliver(&self, alert: &ReminderAlert) -> Result<(), NotifyError> {
        let response = self.http.post(&self.url).json(alert).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::info!(url = %self.url, "Reminder webhook delivered");
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
