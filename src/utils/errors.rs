//! Error handling for NS Logger
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the NS Logger application
#[derive(Error, Debug)]
pub enum NsLoggerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Bot not found: {name}")]
    BotNotFound { name: String },

    #[error("Malformed conversation state: {0}")]
    MalformedState(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for NS Logger operations
pub type Result<T> = std::result::Result<T, NsLoggerError>;

impl NsLoggerError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            NsLoggerError::Database(_) => ErrorSeverity::Critical,
            NsLoggerError::Config(_) => ErrorSeverity::Critical,
            NsLoggerError::PermissionDenied(_) => ErrorSeverity::Warning,
            NsLoggerError::InvalidInput(_) => ErrorSeverity::Info,
            NsLoggerError::MalformedState(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
