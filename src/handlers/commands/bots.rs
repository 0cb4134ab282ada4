//! Bot registration and removal flows
//!
//! Add-bot is a two-step flow (name, then log path); remove-bot is a
//! single-shot confirmation whose affirmative label embeds the exact bot
//! name captured at prompt time.

use tracing::warn;

use crate::state::{
    AppContext, ConversationContext, FlowStep, KEY_BOT_NAME, KEY_CONFIRM_LABEL,
};
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

use super::super::actions::is_valid_bot_name;
use super::super::keyboards;
use super::super::messages::IncomingMessage;
use super::super::{abort_flow, render_main_menu, send, NO_PERMISSION};

/// Entry point of the add-bot flow
pub async fn handle_add_bot_trigger(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    if !ctx.auth.can_manage(&msg.username).await? {
        send(ctx, msg.chat_id, NO_PERMISSION, None).await;
        return Ok(());
    }

    ctx.state
        .set(ConversationContext::new(msg.chat_id, FlowStep::WaitingForBotName))
        .await;
    send(
        ctx,
        msg.chat_id,
        "Enter the name of the new bot:",
        Some(keyboards::back_button()),
    )
    .await;
    Ok(())
}

/// Second step: the bot name arrived, ask for the log path.
pub async fn handle_bot_name_input(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    let name = msg.text.trim();

    if !is_valid_bot_name(name) {
        send(
            ctx,
            msg.chat_id,
            "❌ Bot names may only contain letters, digits, dots, dashes and underscores (max 64 characters). Try again:",
            Some(keyboards::back_button()),
        )
        .await;
        return Ok(());
    }

    ctx.state
        .set(
            ConversationContext::new(msg.chat_id, FlowStep::WaitingForLogPath)
                .with_data(KEY_BOT_NAME, name),
        )
        .await;
    send(
        ctx,
        msg.chat_id,
        &format!("Enter the log path for bot {}:", name),
        Some(keyboards::back_button()),
    )
    .await;
    Ok(())
}

/// Final step: the log path arrived, commit the bot.
pub async fn handle_log_path_input(
    ctx: &AppContext,
    msg: &IncomingMessage,
    context: &ConversationContext,
) -> Result<()> {
    let Some(bot_name) = context.get(KEY_BOT_NAME).map(str::to_string) else {
        return abort_flow(ctx, msg.chat_id, &msg.username, "add-bot").await;
    };

    let log_path = msg.text.trim();
    let added = ctx.db.bots.add_bot(&bot_name, log_path, &msg.username).await?;
    ctx.state.clear(msg.chat_id).await;

    let text = if added {
        log_admin_action(&msg.username, "add_bot", Some(&bot_name));
        format!("✅ Bot {} added!\nLog path: {}", bot_name, log_path)
    } else {
        format!("❌ A bot named {} already exists!", bot_name)
    };
    let keyboard = render_main_menu(ctx, &msg.username).await?;
    send(ctx, msg.chat_id, &text, Some(keyboard)).await;
    Ok(())
}

/// Show the bots visible to the requesting user
pub async fn handle_bot_list(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    let visible = ctx.auth.visible_bots(&msg.username).await?;

    if visible.is_empty() {
        let text = if ctx.auth.can_manage(&msg.username).await? {
            "No bots registered yet. Add one first."
        } else {
            "❌ You don't have access to any bot yet.\nContact a system operator to be granted access."
        };
        let keyboard = render_main_menu(ctx, &msg.username).await?;
        send(ctx, msg.chat_id, text, Some(keyboard)).await;
        return Ok(());
    }

    send(
        ctx,
        msg.chat_id,
        "🤖 Your bots:",
        Some(keyboards::bot_list(&visible)),
    )
    .await;
    Ok(())
}

/// A bot was selected while idle: offer its log actions.
pub async fn handle_bot_selected(
    ctx: &AppContext,
    msg: &IncomingMessage,
    bot_name: &str,
) -> Result<()> {
    if !ctx.auth.can_view(&msg.username, bot_name).await? {
        warn!(username = %msg.username, bot = bot_name, "Unauthorized bot selection");
        send(
            ctx,
            msg.chat_id,
            &format!("❌ You don't have access to the logs of bot {}.", bot_name),
            None,
        )
        .await;
        return Ok(());
    }

    send(
        ctx,
        msg.chat_id,
        &format!("🤖 Selected bot: {}\n\nChoose an action:", bot_name),
        Some(keyboards::bot_actions(bot_name)),
    )
    .await;
    Ok(())
}

/// Entry point of the remove-bot flow: ask for confirmation.
pub async fn handle_remove_bot_trigger(
    ctx: &AppContext,
    chat_id: i64,
    username: &str,
    bot_name: &str,
) -> Result<()> {
    if !ctx.auth.can_manage(username).await? {
        send(ctx, chat_id, NO_PERMISSION, None).await;
        return Ok(());
    }

    if ctx.db.bots.find_by_name(bot_name).await?.is_none() {
        let keyboard = render_main_menu(ctx, username).await?;
        send(
            ctx,
            chat_id,
            &format!("❌ Bot {} not found.", bot_name),
            Some(keyboard),
        )
        .await;
        return Ok(());
    }

    let label = keyboards::confirm_removal_label(bot_name);
    ctx.state
        .set(
            ConversationContext::new(chat_id, FlowStep::ConfirmBotRemoval)
                .with_data(KEY_BOT_NAME, bot_name)
                .with_data(KEY_CONFIRM_LABEL, label),
        )
        .await;
    send(
        ctx,
        chat_id,
        &format!("Are you sure you want to remove bot {}?", bot_name),
        Some(keyboards::confirm_removal(bot_name)),
    )
    .await;
    Ok(())
}

/// Single-shot confirmation: only the exact affirmative label removes the
/// bot; any other reply silently cancels.
pub async fn handle_confirm_removal_input(
    ctx: &AppContext,
    msg: &IncomingMessage,
    context: &ConversationContext,
) -> Result<()> {
    let Some(bot_name) = context.get(KEY_BOT_NAME).map(str::to_string) else {
        return abort_flow(ctx, msg.chat_id, &msg.username, "remove-bot").await;
    };
    let expected = context
        .get(KEY_CONFIRM_LABEL)
        .map(str::to_string)
        .unwrap_or_else(|| keyboards::confirm_removal_label(&bot_name));

    ctx.state.clear(msg.chat_id).await;

    let text = if msg.text == expected {
        if ctx.db.bots.remove_bot(&bot_name).await? {
            log_admin_action(&msg.username, "remove_bot", Some(&bot_name));
            format!("✅ Bot {} removed!", bot_name)
        } else {
            format!("❌ Could not remove bot {}!", bot_name)
        }
    } else {
        "Removal cancelled.".to_string()
    };
    let keyboard = render_main_menu(ctx, &msg.username).await?;
    send(ctx, msg.chat_id, &text, Some(keyboard)).await;
    Ok(())
}
