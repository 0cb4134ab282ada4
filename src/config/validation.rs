//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{NsLoggerError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_storage_config(&settings.storage)?;
    validate_logs_config(&settings.logs)?;
    validate_logging_config(&settings.logging)?;
    validate_bootstrap_config(&settings.bootstrap)?;
    Ok(())
}

fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(NsLoggerError::Config(
            "Bot token is required".to_string()
        ));
    }
    Ok(())
}

fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.database_url.is_empty() {
        return Err(NsLoggerError::Config(
            "Database URL is required".to_string()
        ));
    }
    Ok(())
}

fn validate_logs_config(config: &super::LogsConfig) -> Result<()> {
    if config.dir.is_empty() {
        return Err(NsLoggerError::Config(
            "Logs directory is required".to_string()
        ));
    }
    if config.watch_interval_secs == 0 {
        return Err(NsLoggerError::Config(
            "Watch interval must be at least one second".to_string()
        ));
    }
    Ok(())
}

fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(NsLoggerError::Config(
            "Log level is required".to_string()
        ));
    }
    if config.dir.is_empty() {
        return Err(NsLoggerError::Config(
            "Log directory is required".to_string()
        ));
    }
    Ok(())
}

fn validate_bootstrap_config(config: &super::BootstrapConfig) -> Result<()> {
    // Without at least one operator a fresh install has no one able to
    // pass the console gate.
    if config.operators.is_empty() && config.global_admins.is_empty() {
        return Err(NsLoggerError::Config(
            "At least one bootstrap operator or global admin must be configured".to_string()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "123456:TEST".to_string();
        settings.bootstrap.operators = vec!["root_op".to_string()];
        settings
    }

    #[test]
    fn accepts_valid_settings() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn rejects_empty_token() {
        let mut settings = valid_settings();
        settings.bot.token.clear();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_missing_bootstrap_roles() {
        let mut settings = valid_settings();
        settings.bootstrap.operators.clear();
        settings.bootstrap.global_admins.clear();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_zero_watch_interval() {
        let mut settings = valid_settings();
        settings.logs.watch_interval_secs = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
