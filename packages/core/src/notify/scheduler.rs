//! Reminder scheduling.
//!
//! Arms a fire-and-forget Tokio timer per booking. The timer task owns a
//! copy of everything it needs (shop name, lead time, appointment time), so
//! it can outlive the booking call without touching store state.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use tokio::runtime::Handle;
use tokio::time;

use crate::models::NotificationPermission;
use crate::notify::notifier::{LogNotifier, Notifier, ReminderAlert};

/// Values captured at booking time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub shop_name: String,
    pub slot_time: NaiveDateTime,
    pub lead_minutes: u32,
}

impl ReminderRequest {
    /// Slot time minus the lead time.
    pub fn reminder_time(&self) -> NaiveDateTime {
        self.slot_time - Duration::minutes(i64::from(self.lead_minutes))
    }
}

/// What happened to a reminder request. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled { fire_at: NaiveDateTime },
    PermissionNotGranted(NotificationPermission),
    ReminderInPast,
    /// No Tokio runtime was available to host the timer.
    NoRuntime,
}

impl ScheduleOutcome {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleOutcome::Scheduled { .. } => "scheduled",
            ScheduleOutcome::PermissionNotGranted(_) => "permission_not_granted",
            ScheduleOutcome::ReminderInPast => "reminder_in_past",
            ScheduleOutcome::NoRuntime => "no_runtime",
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, ScheduleOutcome::Scheduled { .. })
    }
}

/// Schedules reminder alerts when the startup permission allows it.
#[derive(Clone)]
pub struct ReminderScheduler {
    permission: NotificationPermission,
    notifier: Arc<dyn Notifier + Send + Sync>,
}

impl std::fmt::Debug for ReminderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderScheduler")
            .field("permission", &self.permission)
            .field("notifier", &self.notifier.name())
            .finish()
    }
}

impl Default for ReminderScheduler {
    /// Permission not yet requested, alerts go to the log.
    fn default() -> Self {
        Self::new(NotificationPermission::Default, Arc::new(LogNotifier))
    }
}

impl ReminderScheduler {
    pub fn new(
        permission: NotificationPermission,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Self {
        Self {
            permission,
            notifier,
        }
    }

    pub fn permission(&self) -> NotificationPermission {
        self.permission
    }

    /// Arm a one-shot reminder for `request` if permitted and still ahead of
    /// `now`. Never fails; the outcome only says what was done.
    pub fn schedule(&self, request: ReminderRequest, now: NaiveDateTime) -> ScheduleOutcome {
        if self.permission != NotificationPermission::Granted {
            tracing::debug!(
                permission = %self.permission,
                "Reminder skipped: notifications not granted"
            );
            return ScheduleOutcome::PermissionNotGranted(self.permission);
        }

        let fire_at = request.reminder_time();
        if fire_at <= now {
            tracing::debug!(%fire_at, %now, "Reminder skipped: reminder time already passed");
            return ScheduleOutcome::ReminderInPast;
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                tracing::warn!("Reminder skipped: no async runtime available: {}", err);
                return ScheduleOutcome::NoRuntime;
            }
        };

        let delay = (fire_at - now).to_std().unwrap_or_default();
        let alert = ReminderAlert::new(&request.shop_name, request.lead_minutes, request.slot_time);
        let notifier = Arc::clone(&self.notifier);

        handle.spawn(async move {
            time::sleep(delay).await;
            fire(notifier, alert).await;
        });

        tracing::info!(
            shop = %request.shop_name,
            %fire_at,
            notifier = self.notifier.name(),
            "Reminder scheduled"
        );
        ScheduleOutcome::Scheduled { fire_at }
    }
}

async fn fire(notifier: Arc<dyn Notifier + Send + Sync>, alert: ReminderAlert) {
    match notifier.deliver(&alert).await {
        Ok(()) => tracing::debug!(notifier = notifier.name(), "Reminder delivered"),
        Err(err) => tracing::error!(
            notifier = notifier.name(),
            "Reminder delivery failed for {}: {}",
            alert.shop_name,
            err
        ),
    }
}
