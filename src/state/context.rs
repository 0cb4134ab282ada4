//! Conversation and application context
//!
//! Tracks what input a chat is expected to send next, together with any
//! partial data collected so far, and bundles the services every handler
//! needs. Conversation state is process-lifetime only: a restart resets
//! all in-flight flows, which is part of the contract.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::services::{AuthService, LogService, LogWatchRegistry, MessagingGateway};
use crate::state::storage::StateStorage;

/// Application-wide context containing services and settings
#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub db: DatabaseService,
    pub auth: AuthService,
    pub logs: LogService,
    pub watches: Arc<LogWatchRegistry>,
    pub state: StateStorage,
    pub gateway: Arc<dyn MessagingGateway>,
}

impl AppContext {
    pub fn new(
        settings: Settings,
        db: DatabaseService,
        gateway: Arc<dyn MessagingGateway>,
    ) -> Self {
        let auth = AuthService::new(db.clone());
        let logs = LogService::new(&settings.logs.dir);
        let watches = Arc::new(LogWatchRegistry::new(std::time::Duration::from_secs(
            settings.logs.watch_interval_secs,
        )));
        Self {
            settings,
            db,
            auth,
            logs,
            watches,
            state: StateStorage::new(),
            gateway,
        }
    }
}

/// Pending-input steps a chat can be in. Absence of a context means idle:
/// the next message is interpreted as a menu command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    WaitingForBotName,
    WaitingForLogPath,
    WaitingForNewAdmin,
    WaitingForAdminToRemove,
    AdminManagement,
    ConfirmBotRemoval,
    WaitingForGlobalAdmins,
}

/// Data keys used by the flows
pub const KEY_BOT_NAME: &str = "bot_name";
pub const KEY_CONFIRM_LABEL: &str = "confirm_label";

/// Per-chat conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Chat this context belongs to
    pub chat_id: i64,
    /// The input expected next
    pub step: FlowStep,
    /// Partial data collected so far
    pub data: HashMap<String, String>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new(chat_id: i64, step: FlowStep) -> Self {
        Self {
            chat_id,
            step,
            data: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Builder-style data attachment
    pub fn with_data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self.updated_at = Utc::now();
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_data_round_trip() {
        let context = ConversationContext::new(7, FlowStep::WaitingForLogPath)
            .with_data(KEY_BOT_NAME, "alpha");
        assert_eq!(context.step, FlowStep::WaitingForLogPath);
        assert_eq!(context.get(KEY_BOT_NAME), Some("alpha"));
        assert_eq!(context.get(KEY_CONFIRM_LABEL), None);
    }
}
