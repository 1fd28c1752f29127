//! Unified error types for DueBill.

use thiserror::Error;

/// Result type alias using DueBillError.
pub type Result<T> = std::result::Result<T, DueBillError>;

#[derive(Error, Debug)]
pub enum DueBillError {
    // Bill lookup errors
    #[error("No bill found with ID {0}")]
    NotFound(i64),

    // Per-item input errors (CSV rows, CLI fields, notify descriptors)
    #[error("Validation error: {0}")]
    Validation(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Migration error: {0}")]
    Migration(String),

    // Notification channel errors
    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DueBillError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn migration(msg: impl Into<String>) -> Self {
        Self::Migration(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }
}
