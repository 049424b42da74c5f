use std::error::Error;
use std::fmt;

use thiserror::Error;

use crate::models::{ShopId, SlotId};

/// Unified startup error.
///
/// Covers everything that can stop the binary before the session starts
/// (bad configuration, terminal I/O, metrics registration).
#[derive(Debug)]
pub enum AppError {
    Config(String),
    Io(std::io::Error),
    Metrics(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Metrics(msg) => write!(f, "Metrics error: {}", msg),
        }
    }
}

impl Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<prometheus::Error> for AppError {
    fn from(err: prometheus::Error) -> Self {
        AppError::Metrics(err.to_string())
    }
}

/// Coarse classification of [`StoreError`] used to pick user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyBooked,
    InvalidInput,
}

impl ErrorKind {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyBooked => "already_booked",
            ErrorKind::InvalidInput => "invalid_input",
        }
    }
}

/// Errors returned by the appointment store's mutating operations.
///
/// Every variant is reported before any state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("shop {shop_id} not found")]
    ShopNotFound { shop_id: ShopId },

    #[error("slot {slot_id} not found in shop {shop_id}")]
    SlotNotFound { shop_id: ShopId, slot_id: SlotId },

    #[error("slot {slot_id} in shop {shop_id} is already booked")]
    AlreadyBooked { shop_id: ShopId, slot_id: SlotId },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl StoreError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ShopNotFound { .. } | Self::SlotNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyBooked { .. } => ErrorKind::AlreadyBooked,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
        }
    }
}

/// Errors from reminder delivery. Never surfaced to the booking caller.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Webhook rejected alert with status {status}")]
    Rejected { status: u16 },
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Network {
            message: err.to_string(),
        }
    }
}
