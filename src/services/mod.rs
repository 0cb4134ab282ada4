//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod gateway;
pub mod logs;

// Re-export commonly used services
pub use auth::AuthService;
pub use gateway::{Keyboard, MessagingGateway, TelegramGateway, TextFormat};
pub use logs::{LogService, LogWatchRegistry};
