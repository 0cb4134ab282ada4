//! Managed-bot repository implementation
//!
//! Boolean outcomes ("already exists", "was not an admin") are derived
//! from `rows_affected`, so concurrent calls for the same key serialize
//! inside SQLite instead of racing a read-then-write in the handler.

use chrono::Utc;
use crate::database::connection::DatabasePool;
use crate::models::bot::ManagedBot;
use crate::utils::errors::NsLoggerError;

#[derive(Debug, Clone)]
pub struct BotRepository {
    pool: DatabasePool,
}

impl BotRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Register a new bot. The creator becomes its first local admin.
    ///
    /// Returns false without mutating anything when a bot with this name
    /// already exists.
    pub async fn add_bot(
        &self,
        name: &str,
        log_path: &str,
        added_by: &str,
    ) -> Result<bool, NsLoggerError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO bots (name, log_path, created_at) VALUES (?, ?, ?)"
        )
        .bind(name)
        .bind(log_path)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT OR IGNORE INTO bot_ladmins (bot_name, username) VALUES (?, ?)"
        )
        .bind(name)
        .bind(added_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(bot = name, log_path = log_path, added_by = added_by, "Bot registered");
        Ok(true)
    }

    /// Delete a bot; its admin rows go with it (ON DELETE CASCADE).
    pub async fn remove_bot(&self, name: &str) -> Result<bool, NsLoggerError> {
        let result = sqlx::query("DELETE FROM bots WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!(bot = name, "Bot removed");
        }
        Ok(removed)
    }

    /// Grant a user local-admin scope over a bot.
    ///
    /// Returns false when the bot does not exist or the user already is an
    /// admin of it; the single INSERT keeps duplicate concurrent grants
    /// from both succeeding.
    pub async fn add_admin(&self, bot_name: &str, username: &str) -> Result<bool, NsLoggerError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO bot_ladmins (bot_name, username)
            SELECT ?1, ?2 WHERE EXISTS (SELECT 1 FROM bots WHERE name = ?1)
            "#
        )
        .bind(bot_name)
        .bind(username)
        .execute(&self.pool)
        .await?;

        let added = result.rows_affected() > 0;
        if added {
            tracing::info!(bot = bot_name, username = username, "Local admin added");
        }
        Ok(added)
    }

    /// Revoke a user's local-admin scope over a bot.
    pub async fn remove_admin(&self, bot_name: &str, username: &str) -> Result<bool, NsLoggerError> {
        let result = sqlx::query(
            "DELETE FROM bot_ladmins WHERE bot_name = ? AND username = ?"
        )
        .bind(bot_name)
        .bind(username)
        .execute(&self.pool)
        .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!(bot = bot_name, username = username, "Local admin removed");
        }
        Ok(removed)
    }

    /// Find a bot by name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<ManagedBot>, NsLoggerError> {
        let bot = sqlx::query_as::<_, ManagedBot>(
            "SELECT name, log_path, created_at FROM bots WHERE name = ?"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bot)
    }

    /// List all bot names
    pub async fn list_bots(&self) -> Result<Vec<String>, NsLoggerError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM bots ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// List the local admins of a bot
    pub async fn list_admins(&self, bot_name: &str) -> Result<Vec<String>, NsLoggerError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT username FROM bot_ladmins WHERE bot_name = ? ORDER BY username ASC"
        )
        .bind(bot_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(username,)| username).collect())
    }

    /// List the bots a user is a local admin of
    pub async fn list_bots_for_admin(&self, username: &str) -> Result<Vec<String>, NsLoggerError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT bot_name FROM bot_ladmins WHERE username = ? ORDER BY bot_name ASC"
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Look up a bot's log path
    pub async fn get_log_path(&self, bot_name: &str) -> Result<Option<String>, NsLoggerError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT log_path FROM bots WHERE name = ?")
            .bind(bot_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(path,)| path))
    }

    /// Count registered bots
    pub async fn count(&self) -> Result<i64, NsLoggerError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bots")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count local-admin assignments across all bots
    pub async fn count_admin_assignments(&self) -> Result<i64, NsLoggerError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bot_ladmins")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
