//! Repository implementations for the persistent store

pub mod users;
pub mod bots;
pub mod roles;

pub use users::UserRepository;
pub use bots::BotRepository;
pub use roles::RoleRepository;
