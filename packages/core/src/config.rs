use std::env;

use crate::cli::Cli;
use crate::models::{NotificationPermission, Role};

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capability status for reminder alerts; not re-queried later.
    pub notification_permission: NotificationPermission,
    /// When set, fired reminders are POSTed here instead of logged.
    pub reminder_webhook_url: Option<String>,
    pub default_role: Role,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let notification_permission = match lookup("NOTIFICATION_PERMISSION") {
            Some(raw) => raw
                .parse::<NotificationPermission>()
                .map_err(|e| format!("NOTIFICATION_PERMISSION: {}", e))?,
            None => NotificationPermission::default(),
        };

        let reminder_webhook_url = match lookup("REMINDER_WEBHOOK_URL") {
            Some(raw) => webhook_url("REMINDER_WEBHOOK_URL", &raw)?,
            None => None,
        };

        let default_role = match lookup("DEFAULT_ROLE") {
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|e| format!("DEFAULT_ROLE: {}", e))?,
            None => Role::default(),
        };

        Ok(Self {
            notification_permission,
            reminder_webhook_url,
            default_role,
        })
    }

    /// Command-line flags take precedence over the environment.
    pub fn with_cli(mut self, cli: &Cli) -> Result<Self, String> {
        if let Some(permission) = cli.permission {
            self.notification_permission = permission;
        }
        if let Some(raw) = &cli.webhook_url {
            self.reminder_webhook_url = webhook_url("--webhook-url", raw)?;
        }
        if let Some(role) = cli.role {
            self.default_role = role;
        }
        Ok(self)
    }
}

/// Blank means unset; anything else must be an http(s) URL.
fn webhook_url(source: &str, raw: &str) -> Result<Option<String>, String> {
    let url = raw.trim();
    if url.is_empty() {
        return Ok(None);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(format!("{} must be an http(s) URL: {}", source, url));
    }
    Ok(Some(url.to_string()))
}
