//! Role assignment repository (operators and global admins)

use crate::database::connection::DatabasePool;
use crate::utils::errors::NsLoggerError;

#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: DatabasePool,
}

impl RoleRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn is_operator(&self, username: &str) -> Result<bool, NsLoggerError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT username FROM operators WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn is_global_admin(&self, username: &str) -> Result<bool, NsLoggerError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT username FROM global_admins WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn list_operators(&self) -> Result<Vec<String>, NsLoggerError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT username FROM operators ORDER BY username ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(username,)| username).collect())
    }

    pub async fn list_global_admins(&self) -> Result<Vec<String>, NsLoggerError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT username FROM global_admins ORDER BY username ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(username,)| username).collect())
    }

    /// Add an operator; duplicate grants are no-ops.
    pub async fn add_operator(&self, username: &str) -> Result<bool, NsLoggerError> {
        let result = sqlx::query("INSERT OR IGNORE INTO operators (username) VALUES (?)")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Add a global admin; duplicate grants are no-ops.
    pub async fn add_global_admin(&self, username: &str) -> Result<bool, NsLoggerError> {
        let result = sqlx::query("INSERT OR IGNORE INTO global_admins (username) VALUES (?)")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the entire global-admin set in one transaction.
    ///
    /// This is a wholesale replace, not a merge: usernames absent from the
    /// new list lose global-admin standing.
    pub async fn replace_global_admins(&self, usernames: &[String]) -> Result<(), NsLoggerError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM global_admins").execute(&mut *tx).await?;

        for username in usernames {
            sqlx::query("INSERT OR IGNORE INTO global_admins (username) VALUES (?)")
                .bind(username)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::warn!(count = usernames.len(), "Global admin set replaced");
        Ok(())
    }

    pub async fn count_global_admins(&self) -> Result<i64, NsLoggerError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM global_admins")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
