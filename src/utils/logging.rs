//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the NS Logger application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// Returns the appender guard; dropping it stops the background writer,
/// so the caller must hold it for the process lifetime.
pub fn init_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.dir, "nslogger.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(username: &str, action: &str, details: Option<&str>) {
    info!(
        username = username,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log admin actions against bots or role tables
pub fn log_admin_action(username: &str, action: &str, target: Option<&str>) {
    warn!(
        username = username,
        action = action,
        target = target,
        "Admin action performed"
    );
}

/// Log denied access attempts
pub fn log_access_denied(username: &str, user_id: i64, reason: &str) {
    warn!(
        username = username,
        user_id = user_id,
        reason = reason,
        "Access denied"
    );
}
