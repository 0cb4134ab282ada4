//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::config::BootstrapConfig;
use crate::database::connection::DatabasePool;
use crate::database::repositories::{BotRepository, RoleRepository, UserRepository};
use crate::models::Rank;
use crate::utils::errors::NsLoggerError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub bots: BotRepository,
    pub roles: RoleRepository,
}

/// Counters shown by the statistics card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub bots: i64,
    pub admin_assignments: i64,
    pub global_admins: i64,
    pub operators: i64,
    pub users: i64,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            bots: BotRepository::new(pool.clone()),
            roles: RoleRepository::new(pool),
        }
    }

    /// Seed the role tables from configuration so a fresh deployment has
    /// at least one account that can pass the console gate.
    pub async fn bootstrap(&self, config: &BootstrapConfig) -> Result<(), NsLoggerError> {
        for username in &config.operators {
            if self.roles.add_operator(username).await? {
                tracing::info!(username = %username, "Bootstrapped operator");
            }
        }
        for username in &config.global_admins {
            if self.roles.add_global_admin(username).await? {
                tracing::info!(username = %username, "Bootstrapped global admin");
            }
        }
        Ok(())
    }

    /// Register a user on first contact. The initial stored rank mirrors
    /// the role tables so configured operators and global admins can pass
    /// the console gate; existing rows are never touched.
    pub async fn register_user(
        &self,
        username: &str,
        user_id: i64,
        first_name: Option<&str>,
    ) -> Result<bool, NsLoggerError> {
        let rank = if self.roles.is_operator(username).await? {
            Rank::Operator
        } else if self.roles.is_global_admin(username).await? {
            Rank::Gadmin
        } else {
            Rank::User
        };
        self.users.register(username, user_id, first_name, rank).await
    }

    /// Gather the statistics card counters
    pub async fn statistics(&self) -> Result<Statistics, NsLoggerError> {
        Ok(Statistics {
            bots: self.bots.count().await?,
            admin_assignments: self.bots.count_admin_assignments().await?,
            global_admins: self.roles.count_global_admins().await?,
            operators: self.roles.list_operators().await?.len() as i64,
            users: self.users.count().await?,
        })
    }
}
