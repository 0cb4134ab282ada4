//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub logs: LogsConfig,
    pub logging: LoggingConfig,
    pub bootstrap: BootstrapConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Warn ceiling shown in the /me profile card.
    pub max_warns: u32,
}

/// Persistent store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database URL, e.g. `sqlite://data/nslogger.db`
    pub database_url: String,
}

/// Managed-bot log access configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogsConfig {
    /// Directory the managed bots write their logs under; relative log
    /// paths given in the add-bot flow resolve against it.
    pub dir: String,
    /// Poll interval for realtime log watches, in seconds.
    pub watch_interval_secs: u64,
}

/// Logging configuration for the console itself
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: String,
}

/// Role assignments seeded into the store at startup
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BootstrapConfig {
    pub operators: Vec<String>,
    pub global_admins: Vec<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("NSLOGGER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::NsLoggerError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                max_warns: 3,
            },
            storage: StorageConfig {
                database_url: "sqlite://data/nslogger.db".to_string(),
            },
            logs: LogsConfig {
                dir: "logs".to_string(),
                watch_interval_secs: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                dir: "logs/nslogger".to_string(),
            },
            bootstrap: BootstrapConfig {
                operators: vec![],
                global_admins: vec![],
            },
        }
    }
}
