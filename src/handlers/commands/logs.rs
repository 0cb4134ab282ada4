//! Log access handlers: tail views, downloads, realtime watches
//!
//! All of these are reached through inline-keyboard callbacks carrying the
//! bot name; visibility is re-checked on every call because admin sets can
//! change between rendering a keyboard and pressing its buttons.

use std::sync::Arc;

use tracing::{error, warn};

use crate::services::logs::html_escape;
use crate::state::AppContext;
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

use super::super::keyboards;
use super::super::{answer, send, send_html};

const CALLBACK_DENIED: &str = "❌ You don't have access to this bot.";

/// Send the last `lines` lines of a bot's log
pub async fn handle_log_tail(
    ctx: &AppContext,
    chat_id: i64,
    callback_id: &str,
    username: &str,
    bot_name: &str,
    lines: usize,
) -> Result<()> {
    if !ctx.auth.can_view(username, bot_name).await? {
        warn!(username = username, bot = bot_name, "Unauthorized log tail attempt");
        answer(ctx, callback_id, Some(CALLBACK_DENIED)).await;
        return Ok(());
    }

    let Some(log_path) = ctx.db.bots.get_log_path(bot_name).await? else {
        answer(ctx, callback_id, None).await;
        send(
            ctx,
            chat_id,
            &format!("❌ No log path recorded for bot {}.", bot_name),
            Some(keyboards::bot_actions(bot_name)),
        )
        .await;
        return Ok(());
    };

    match ctx.logs.tail(&log_path, lines).await? {
        Some(content) => {
            log_user_action(username, "log_tail", Some(bot_name));
            send_html(
                ctx,
                chat_id,
                &format!(
                    "📄 Last {} lines of {} logs:\n\n<code>{}</code>",
                    lines,
                    bot_name,
                    html_escape(&content)
                ),
                Some(keyboards::bot_actions(bot_name)),
            )
            .await;
            answer(ctx, callback_id, Some("✅ Logs delivered")).await;
        }
        None => {
            answer(ctx, callback_id, None).await;
            send(
                ctx,
                chat_id,
                &format!(
                    "❌ Could not read logs for bot {}. File missing or empty.",
                    bot_name
                ),
                Some(keyboards::bot_actions(bot_name)),
            )
            .await;
        }
    }
    Ok(())
}

/// Send the whole log file as a document
pub async fn handle_download(
    ctx: &AppContext,
    chat_id: i64,
    callback_id: &str,
    username: &str,
    bot_name: &str,
) -> Result<()> {
    if !ctx.auth.can_view(username, bot_name).await? {
        warn!(username = username, bot = bot_name, "Unauthorized log download attempt");
        answer(ctx, callback_id, Some(CALLBACK_DENIED)).await;
        return Ok(());
    }

    let Some(log_path) = ctx.db.bots.get_log_path(bot_name).await? else {
        answer(ctx, callback_id, None).await;
        send(
            ctx,
            chat_id,
            &format!("❌ No log path recorded for bot {}.", bot_name),
            Some(keyboards::bot_actions(bot_name)),
        )
        .await;
        return Ok(());
    };

    let path = ctx.logs.resolve(&log_path);
    if !path.exists() {
        answer(ctx, callback_id, None).await;
        send(
            ctx,
            chat_id,
            &format!("❌ Log file not found at: {}", path.display()),
            Some(keyboards::bot_actions(bot_name)),
        )
        .await;
        return Ok(());
    }

    let caption = format!("📁 Logs for bot {}", bot_name);
    match ctx.gateway.send_document(chat_id, &path, &caption).await {
        Ok(()) => {
            log_user_action(username, "log_download", Some(bot_name));
            answer(ctx, callback_id, Some("✅ Log file sent")).await;
        }
        Err(e) => {
            error!(bot = bot_name, error = %e, "Failed to send log file");
            answer(ctx, callback_id, Some("❌ Error sending the log file")).await;
        }
    }
    Ok(())
}

/// Start forwarding new log entries to the chat
pub async fn handle_watch(
    ctx: &AppContext,
    chat_id: i64,
    callback_id: &str,
    username: &str,
    bot_name: &str,
) -> Result<()> {
    if !ctx.auth.can_view(username, bot_name).await? {
        warn!(username = username, bot = bot_name, "Unauthorized log watch attempt");
        answer(ctx, callback_id, Some(CALLBACK_DENIED)).await;
        return Ok(());
    }

    let Some(log_path) = ctx.db.bots.get_log_path(bot_name).await? else {
        answer(ctx, callback_id, None).await;
        send(
            ctx,
            chat_id,
            &format!("❌ No log path recorded for bot {}.", bot_name),
            Some(keyboards::bot_actions(bot_name)),
        )
        .await;
        return Ok(());
    };

    let path = ctx.logs.resolve(&log_path);
    match ctx
        .watches
        .subscribe(chat_id, bot_name, path, Arc::clone(&ctx.gateway))
        .await
    {
        Ok(()) => {
            log_user_action(username, "log_watch", Some(bot_name));
            answer(ctx, callback_id, Some("🔍 Realtime mode enabled")).await;
            send(
                ctx,
                chat_id,
                &format!(
                    "🔍 Realtime mode for bot {} enabled.\nNew log entries will be forwarded automatically.\nUse ⏹ Stop watching to stop.",
                    bot_name
                ),
                Some(keyboards::bot_actions(bot_name)),
            )
            .await;
        }
        Err(e) => {
            error!(bot = bot_name, error = %e, "Failed to start log watch");
            answer(ctx, callback_id, None).await;
            send(
                ctx,
                chat_id,
                &format!("❌ Could not enable realtime mode for bot {}.", bot_name),
                Some(keyboards::bot_actions(bot_name)),
            )
            .await;
        }
    }
    Ok(())
}

/// Stop the chat's realtime watch
pub async fn handle_unwatch(
    ctx: &AppContext,
    chat_id: i64,
    callback_id: &str,
    username: &str,
    bot_name: &str,
) -> Result<()> {
    match ctx.watches.unsubscribe(chat_id).await {
        Some(watched) => {
            log_user_action(username, "log_unwatch", Some(&watched));
            answer(ctx, callback_id, Some("⏹ Realtime mode stopped")).await;
            send(
                ctx,
                chat_id,
                &format!("⏹ Realtime mode for bot {} stopped.", watched),
                Some(keyboards::bot_actions(bot_name)),
            )
            .await;
        }
        None => {
            answer(ctx, callback_id, Some("Nothing is being watched")).await;
        }
    }
    Ok(())
}
