//! Database connection management

use std::str::FromStr;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use crate::utils::errors::NsLoggerError;

pub type DatabasePool = Pool<Sqlite>;

/// Create a new database connection pool.
///
/// The database file is created if missing; foreign keys are enabled on
/// every connection so that removing a bot cascades over its admin rows.
pub async fn create_pool(database_url: &str) -> Result<DatabasePool, NsLoggerError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(NsLoggerError::Database)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Create the schema when it does not exist yet.
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), NsLoggerError> {
    tracing::info!("Running database migrations...");

    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            first_name TEXT,
            rank TEXT NOT NULL DEFAULT 'user',
            banned INTEGER NOT NULL DEFAULT 0,
            warns INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS bots (
            name TEXT PRIMARY KEY,
            log_path TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS bot_ladmins (
            bot_name TEXT NOT NULL REFERENCES bots(name) ON DELETE CASCADE,
            username TEXT NOT NULL,
            PRIMARY KEY (bot_name, username)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS global_admins (
            username TEXT PRIMARY KEY
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS operators (
            username TEXT PRIMARY KEY
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
