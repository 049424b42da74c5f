//! Reminder delivery interface.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Title shown on every reminder alert.
pub const REMINDER_TITLE: &str = "Barber Appointment Reminder";

/// The alert delivered when a reminder fires. Built from values captured at
/// booking time, so it never reads store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderAlert {
    pub title: String,
    pub body: String,
    pub shop_name: String,
    pub lead_minutes: u32,
    pub appointment_time: NaiveDateTime,
}

impl ReminderAlert {
    pub fn new(shop_name: &str, lead_minutes: u32, appointment_time: NaiveDateTime) -> Self {
        Self {
            title: REMINDER_TITLE.to_string(),
            body: format!(
                "Your appointment at {} is in {} minutes.",
                shop_name, lead_minutes
            ),
            shop_name: shop_name.to_string(),
            lead_minutes,
            appointment_time,
        }
    }
}

/// Sink for fired reminders.
#[async_trait]
pub trait Notifier {
    /// Deliver one alert. Errors are logged by the caller and dropped.
    async fn deliver(&self, alert: &ReminderAlert) -> Result<(), NotifyError>;

    /// Name of this notifier for logging.
    fn name(&self) -> &str;
}

/// Writes reminders to the log. Used when no other channel is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, alert: &ReminderAlert) -> Result<(), NotifyError> {
        tracing::info!(
            shop = %alert.shop_name,
            lead_minutes = alert.lead_minutes,
            "{}: {}",
            alert.title,
            alert.body
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn alert_body_names_shop_and_lead_time() {
        let alert = ReminderAlert::new("Clipper Kings", 45, noon());
        assert_eq!(alert.title, "Barber Appointment Reminder");
        assert_eq!(alert.body, "Your appointment at Clipper Kings is in 45 minutes.");
    }

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        let alert = ReminderAlert::new("Sharp Styles", 15, noon());
        assert!(LogNotifier.deliver(&alert).await.is_ok());
        assert_eq!(LogNotifier.name(), "log");
    }
}
