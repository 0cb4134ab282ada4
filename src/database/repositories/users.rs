//! User repository implementation

use chrono::Utc;
use crate::database::connection::DatabasePool;
use crate::models::user::{Rank, User};
use crate::utils::errors::NsLoggerError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: DatabasePool,
}

impl UserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Register a user on first contact with the given initial rank.
    ///
    /// Idempotent: an existing row is left untouched (rank, ban and warn
    /// fields included) and the call still reports success.
    pub async fn register(
        &self,
        username: &str,
        user_id: i64,
        first_name: Option<&str>,
        rank: Rank,
    ) -> Result<bool, NsLoggerError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (username, user_id, first_name, rank, banned, warns, created_at)
            VALUES (?, ?, ?, ?, 0, 0, ?)
            "#
        )
        .bind(username)
        .bind(user_id)
        .bind(first_name)
        .bind(rank.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(username = username, user_id = user_id, "Registered new user");
        }
        Ok(true)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, NsLoggerError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT username, user_id, first_name, rank, banned, warns, created_at FROM users WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Overwrite the stored rank of an existing user
    pub async fn set_rank(&self, username: &str, rank: Rank) -> Result<bool, NsLoggerError> {
        let result = sqlx::query("UPDATE users SET rank = ? WHERE username = ?")
            .bind(rank.as_str())
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Ban or unban a user
    pub async fn set_ban_status(&self, username: &str, banned: bool) -> Result<bool, NsLoggerError> {
        let result = sqlx::query("UPDATE users SET banned = ? WHERE username = ?")
            .bind(banned)
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count registered users
    pub async fn count(&self) -> Result<i64, NsLoggerError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
