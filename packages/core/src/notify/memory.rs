//! In-memory notifier that keeps every delivered alert.
//!
//! Useful for tests and for embedding the store where alerts are rendered by
//! the host instead of being pushed out.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::notify::notifier::{Notifier, ReminderAlert};

#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    delivered: Arc<Mutex<Vec<ReminderAlert>>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts delivered so far, oldest first.
    pub fn delivered(&self) -> Vec<ReminderAlert> {
        self.delivered
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn deliver(&self, alert: &ReminderAlert) -> Result<(), NotifyError> {
        if let Ok(mut alerts) = self.delivered.lock() {
            alerts.push(alert.clone());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
