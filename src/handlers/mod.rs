//! Bot handlers module
//!
//! Handlers are organized by type: command/flow handlers, free-text
//! message dispatch, and callback-query dispatch. The action parser and
//! keyboard builders live next to them so labels, parsers and keyboards
//! stay in one place.

pub mod actions;
pub mod keyboards;
pub mod commands;
pub mod messages;
pub mod callbacks;

use tracing::warn;

use crate::services::{Keyboard, TextFormat};
use crate::state::AppContext;
use crate::utils::errors::Result;

/// Fixed denial for users who may not operate the console at all
pub const ACCESS_DENIED: &str =
    "❌ You don't have access to this bot.\n\nThis console is for system administrators only.";

/// Fixed denial for allowed users lacking management rights
pub const NO_PERMISSION: &str = "⛔ You don't have permission to do that.";

/// Send a plain-text message, logging (not propagating) delivery failures.
///
/// Sends are fire-and-forget: state transitions never depend on whether
/// the platform accepted the message.
pub(crate) async fn send(ctx: &AppContext, chat_id: i64, text: &str, keyboard: Option<Keyboard>) {
    if let Err(e) = ctx
        .gateway
        .send_message(chat_id, text, keyboard, TextFormat::Plain)
        .await
    {
        warn!(chat_id = chat_id, error = %e, "Failed to send message");
    }
}

/// Send an HTML-formatted message, logging delivery failures.
pub(crate) async fn send_html(
    ctx: &AppContext,
    chat_id: i64,
    text: &str,
    keyboard: Option<Keyboard>,
) {
    if let Err(e) = ctx
        .gateway
        .send_message(chat_id, text, keyboard, TextFormat::Html)
        .await
    {
        warn!(chat_id = chat_id, error = %e, "Failed to send message");
    }
}

/// Answer a callback query, logging delivery failures.
pub(crate) async fn answer(ctx: &AppContext, callback_id: &str, text: Option<&str>) {
    if let Err(e) = ctx.gateway.answer_callback(callback_id, text).await {
        warn!(callback_id = callback_id, error = %e, "Failed to answer callback");
    }
}

/// Main menu for the given user: managers get the administrative menu,
/// everyone else gets their visible bots plus refresh.
pub(crate) async fn render_main_menu(ctx: &AppContext, username: &str) -> Result<Keyboard> {
    if ctx.auth.can_manage(username).await? {
        return Ok(keyboards::main_menu());
    }

    let bots = ctx.auth.visible_bots(username).await?;
    let mut rows: Vec<Vec<String>> = bots
        .chunks(2)
        .map(|chunk| {
            chunk
                .iter()
                .map(|name| format!("{}{}", actions::BOT_PREFIX, name))
                .collect()
        })
        .collect();
    rows.push(vec![actions::BTN_REFRESH.to_string()]);
    Ok(Keyboard::Reply(rows))
}

/// Defensive abort used when a flow reaches a step with its required data
/// missing: clear the state and return to the main menu instead of
/// crashing the dispatch loop.
pub(crate) async fn abort_flow(
    ctx: &AppContext,
    chat_id: i64,
    username: &str,
    flow: &str,
) -> Result<()> {
    warn!(chat_id = chat_id, flow = flow, "Flow data missing, aborting");
    ctx.state.clear(chat_id).await;
    let keyboard = render_main_menu(ctx, username).await?;
    send(
        ctx,
        chat_id,
        "❌ Error: the bot name for this flow went missing. Please start over.",
        Some(keyboard),
    )
    .await;
    Ok(())
}
