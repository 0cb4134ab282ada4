//! Command and flow handlers

pub mod start;
pub mod bots;
pub mod admins;
pub mod settings;
pub mod logs;
