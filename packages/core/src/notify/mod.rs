//! Best-effort appointment reminders.
//!
//! After a booking the store hands a [`ReminderRequest`] to the
//! [`ReminderScheduler`], which arms a one-shot timer if the platform
//! permission allows it and the reminder time is still ahead. When the timer
//! fires the alert goes to a [`Notifier`]. Nothing here reports back to the
//! booking caller.

pub mod memory;
pub mod notifier;
pub mod scheduler;
pub mod webhook;

pub use memory::InMemoryNotifier;
pub use notifier::{LogNotifier, Notifier, ReminderAlert};
pub use scheduler::{ReminderRequest, ReminderScheduler, ScheduleOutcome};
pub use webhook::WebhookNotifier;
