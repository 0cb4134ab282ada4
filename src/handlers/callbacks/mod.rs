//! Callback-query dispatch
//!
//! Inline-keyboard presses arrive as callback queries whose data is a
//! small `action:bot[:param]` token. The token is parsed into a tagged
//! action here; handlers never see the raw string.

use tracing::{error, warn};

use crate::handlers::actions::{parse_callback_action, CallbackAction};
use crate::handlers::commands::{admins, bots, logs};
use crate::handlers::{answer, ACCESS_DENIED};
use crate::state::AppContext;
use crate::utils::errors::Result;

/// Inbound callback query as delivered by the transport
#[derive(Debug, Clone)]
pub struct IncomingCallback {
    pub callback_id: String,
    /// Chat the inline keyboard was shown in
    pub chat_id: i64,
    pub username: String,
    pub user_id: i64,
    pub data: String,
}

/// Fault-isolating entry point used by the transport layer.
pub async fn dispatch_callback(ctx: &AppContext, query: IncomingCallback) {
    if let Err(e) = handle_callback(ctx, &query).await {
        error!(
            chat_id = query.chat_id,
            username = %query.username,
            severity = %e.severity(),
            error = %e,
            "Callback handler failed"
        );
        answer(ctx, &query.callback_id, Some("❌ Something went wrong")).await;
    }
}

/// Route one callback query.
pub async fn handle_callback(ctx: &AppContext, query: &IncomingCallback) -> Result<()> {
    if !ctx.auth.is_allowed(&query.username, query.user_id).await? {
        answer(ctx, &query.callback_id, Some(ACCESS_DENIED)).await;
        return Ok(());
    }

    let Some(action) = parse_callback_action(&query.data) else {
        warn!(data = %query.data, "Malformed callback data");
        answer(ctx, &query.callback_id, Some("❌ Unknown action")).await;
        return Ok(());
    };

    match action {
        CallbackAction::LogTail { bot, lines } => {
            logs::handle_log_tail(ctx, query.chat_id, &query.callback_id, &query.username, &bot, lines)
                .await
        }
        CallbackAction::Download { bot } => {
            logs::handle_download(ctx, query.chat_id, &query.callback_id, &query.username, &bot)
                .await
        }
        CallbackAction::Watch { bot } => {
            logs::handle_watch(ctx, query.chat_id, &query.callback_id, &query.username, &bot).await
        }
        CallbackAction::Unwatch { bot } => {
            logs::handle_unwatch(ctx, query.chat_id, &query.callback_id, &query.username, &bot)
                .await
        }
        CallbackAction::ListAdmins { bot } => {
            answer(ctx, &query.callback_id, None).await;
            admins::handle_list_admins(ctx, query.chat_id, &query.username, &bot).await
        }
        CallbackAction::AddAdmin { bot } => {
            answer(ctx, &query.callback_id, None).await;
            admins::handle_add_admin_trigger(ctx, query.chat_id, &query.username, &bot).await
        }
        CallbackAction::RemoveAdmin { bot } => {
            answer(ctx, &query.callback_id, None).await;
            admins::handle_remove_admin_trigger(ctx, query.chat_id, &query.username, &bot).await
        }
        CallbackAction::RemoveBot { bot } => {
            answer(ctx, &query.callback_id, None).await;
            bots::handle_remove_bot_trigger(ctx, query.chat_id, &query.username, &bot).await
        }
    }
}
