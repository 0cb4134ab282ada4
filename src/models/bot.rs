//! Managed bot model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A bot registered with the console: its name is the primary key and the
/// user-facing identifier at the same time, so there is no rename path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ManagedBot {
    pub name: String,
    pub log_path: String,
    pub created_at: DateTime<Utc>,
}
