//! Access control service
//!
//! Derives a user's effective rank and bot-visibility set from the role
//! tables and gates every sensitive operation. Local-admin standing is
//! never stored as a rank: it is derived from `bot_ladmins` membership.
//! The console gate (`is_allowed`) deliberately checks the *stored* rank,
//! so membership in a bot's admin set does not by itself open the console.

use tracing::debug;

use crate::database::DatabaseService;
use crate::models::Rank;
use crate::utils::errors::Result;
use crate::utils::logging::log_access_denied;

#[derive(Debug, Clone)]
pub struct AuthService {
    db: DatabaseService,
}

impl AuthService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Effective rank: operator and global-admin sets take precedence over
    /// the rank stored on the user row.
    pub async fn rank(&self, username: &str) -> Result<Rank> {
        let Some(user) = self.db.users.find_by_username(username).await? else {
            return Ok(Rank::None);
        };

        if self.db.roles.is_operator(username).await? {
            return Ok(Rank::Operator);
        }
        if self.db.roles.is_global_admin(username).await? {
            return Ok(Rank::Gadmin);
        }

        Ok(user.stored_rank())
    }

    /// Bots the user may see: every bot for operators and global admins,
    /// otherwise exactly the bots whose admin set contains the username.
    pub async fn visible_bots(&self, username: &str) -> Result<Vec<String>> {
        if self.rank(username).await? >= Rank::Gadmin {
            return self.db.bots.list_bots().await;
        }
        self.db.bots.list_bots_for_admin(username).await
    }

    /// Whether the user may access one specific bot's logs.
    pub async fn can_view(&self, username: &str, bot_name: &str) -> Result<bool> {
        if self.rank(username).await? >= Rank::Gadmin {
            return Ok(true);
        }
        let admins = self.db.bots.list_admins(bot_name).await?;
        Ok(admins.iter().any(|admin| admin == username))
    }

    /// The console gate. Fails for an empty handle, an unknown user, a
    /// banned user, or a stored rank of plain `user`.
    pub async fn is_allowed(&self, username: &str, user_id: i64) -> Result<bool> {
        if username.is_empty() {
            log_access_denied(username, user_id, "no username");
            return Ok(false);
        }

        let Some(user) = self.db.users.find_by_username(username).await? else {
            log_access_denied(username, user_id, "unknown user");
            return Ok(false);
        };

        if user.banned {
            log_access_denied(username, user_id, "banned");
            return Ok(false);
        }

        if user.stored_rank() == Rank::User {
            log_access_denied(username, user_id, "stored rank is user");
            return Ok(false);
        }

        debug!(username = username, user_id = user_id, "Console access granted");
        Ok(true)
    }

    /// Whether the user may run mutating administrative flows (add/remove
    /// bots, edit admin sets, settings).
    pub async fn can_manage(&self, username: &str) -> Result<bool> {
        Ok(self.rank(username).await? >= Rank::Gadmin)
    }
}
