//! In-memory conversation state storage
//!
//! One context per chat, guarded by a read-write lock so handlers running
//! for different chats in parallel cannot corrupt the map. Nothing is
//! persisted: a process restart silently resets all in-flight flows.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::context::ConversationContext;

#[derive(Debug, Clone, Default)]
pub struct StateStorage {
    states: Arc<RwLock<HashMap<i64, ConversationContext>>>,
}

impl StateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a chat's context, overwriting any previous one.
    pub async fn set(&self, context: ConversationContext) {
        debug!(chat_id = context.chat_id, step = ?context.step, "Setting conversation state");
        self.states.write().await.insert(context.chat_id, context);
    }

    /// The chat's current context; `None` means idle.
    pub async fn get(&self, chat_id: i64) -> Option<ConversationContext> {
        self.states.read().await.get(&chat_id).cloned()
    }

    /// Drop the chat's context. Safe to call when none exists.
    pub async fn clear(&self, chat_id: i64) {
        if self.states.write().await.remove(&chat_id).is_some() {
            debug!(chat_id = chat_id, "Cleared conversation state");
        }
    }

    /// Chats currently holding a context (for diagnostics)
    pub async fn active_chats(&self) -> Vec<i64> {
        self.states.read().await.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::context::{ConversationContext, FlowStep, KEY_BOT_NAME};

    #[tokio::test]
    async fn set_overwrites_previous_state() {
        let storage = StateStorage::new();
        storage.set(ConversationContext::new(1, FlowStep::WaitingForBotName)).await;
        storage
            .set(ConversationContext::new(1, FlowStep::WaitingForLogPath).with_data(KEY_BOT_NAME, "alpha"))
            .await;

        let context = storage.get(1).await.unwrap();
        assert_eq!(context.step, FlowStep::WaitingForLogPath);
        assert_eq!(context.get(KEY_BOT_NAME), Some("alpha"));
    }

    #[tokio::test]
    async fn clear_then_get_is_idle() {
        let storage = StateStorage::new();
        storage.set(ConversationContext::new(2, FlowStep::AdminManagement)).await;
        storage.clear(2).await;
        assert!(storage.get(2).await.is_none());
    }

    #[tokio::test]
    async fn clear_when_absent_is_noop() {
        let storage = StateStorage::new();
        storage.clear(42).await;
        assert!(storage.get(42).await.is_none());
    }

    #[tokio::test]
    async fn states_do_not_leak_across_chats() {
        let storage = StateStorage::new();
        storage.set(ConversationContext::new(1, FlowStep::WaitingForBotName)).await;
        assert!(storage.get(2).await.is_none());
        assert_eq!(storage.active_chats().await, vec![1]);
    }
}
