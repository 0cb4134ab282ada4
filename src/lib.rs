//! NS Logger Telegram console
//!
//! A Telegram-based administrative console for managing a fleet of
//! independently running bots: registering bots and their log files,
//! assigning per-bot and global administrators, and serving log tails,
//! downloads and realtime watches to authorized users.

pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{NsLoggerError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::{AuthService, LogService, MessagingGateway, TelegramGateway};
pub use state::{AppContext, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
