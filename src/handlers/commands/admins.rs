//! Per-bot admin management flows

use crate::state::{AppContext, ConversationContext, FlowStep, KEY_BOT_NAME};
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

use super::super::keyboards;
use super::super::messages::IncomingMessage;
use super::super::{abort_flow, render_main_menu, send, NO_PERMISSION};

/// Entry point of admin management: pick a bot first.
pub async fn handle_admin_management(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    if !ctx.auth.can_manage(&msg.username).await? {
        send(ctx, msg.chat_id, NO_PERMISSION, None).await;
        return Ok(());
    }

    let bots = ctx.db.bots.list_bots().await?;
    if bots.is_empty() {
        let keyboard = render_main_menu(ctx, &msg.username).await?;
        send(
            ctx,
            msg.chat_id,
            "No bots registered yet. Add one first.",
            Some(keyboard),
        )
        .await;
        return Ok(());
    }

    ctx.state
        .set(ConversationContext::new(msg.chat_id, FlowStep::AdminManagement))
        .await;
    send(
        ctx,
        msg.chat_id,
        "Choose a bot to manage admins for:",
        Some(keyboards::bot_list(&bots)),
    )
    .await;
    Ok(())
}

/// A bot was selected inside the admin-management flow.
pub async fn handle_admin_bot_selected(
    ctx: &AppContext,
    msg: &IncomingMessage,
    bot_name: &str,
) -> Result<()> {
    ctx.state.clear(msg.chat_id).await;

    if ctx.db.bots.find_by_name(bot_name).await?.is_none() {
        let keyboard = render_main_menu(ctx, &msg.username).await?;
        send(
            ctx,
            msg.chat_id,
            &format!("❌ Bot {} not found.", bot_name),
            Some(keyboard),
        )
        .await;
        return Ok(());
    }

    send(
        ctx,
        msg.chat_id,
        &format!("Managing admins for bot {}:", bot_name),
        Some(keyboards::admin_actions(bot_name)),
    )
    .await;
    Ok(())
}

/// List a bot's local admins
pub async fn handle_list_admins(
    ctx: &AppContext,
    chat_id: i64,
    username: &str,
    bot_name: &str,
) -> Result<()> {
    if !ctx.auth.can_manage(username).await? {
        send(ctx, chat_id, NO_PERMISSION, None).await;
        return Ok(());
    }

    let admins = ctx.db.bots.list_admins(bot_name).await?;
    let text = if admins.is_empty() {
        format!("Bot {} has no admins.", bot_name)
    } else {
        let list: Vec<String> = admins.iter().map(|admin| format!("• @{}", admin)).collect();
        format!("Admins of bot {}:\n{}", bot_name, list.join("\n"))
    };
    send(ctx, chat_id, &text, Some(keyboards::admin_actions(bot_name))).await;
    Ok(())
}

/// Entry point of the add-admin flow
pub async fn handle_add_admin_trigger(
    ctx: &AppContext,
    chat_id: i64,
    username: &str,
    bot_name: &str,
) -> Result<()> {
    if !ctx.auth.can_manage(username).await? {
        send(ctx, chat_id, NO_PERMISSION, None).await;
        return Ok(());
    }

    ctx.state
        .set(
            ConversationContext::new(chat_id, FlowStep::WaitingForNewAdmin)
                .with_data(KEY_BOT_NAME, bot_name),
        )
        .await;
    send(
        ctx,
        chat_id,
        &format!(
            "Enter the username of the new admin for bot {} (without @):",
            bot_name
        ),
        Some(keyboards::back_button()),
    )
    .await;
    Ok(())
}

/// The new admin's username arrived: commit the grant.
pub async fn handle_new_admin_input(
    ctx: &AppContext,
    msg: &IncomingMessage,
    context: &ConversationContext,
) -> Result<()> {
    let Some(bot_name) = context.get(KEY_BOT_NAME).map(str::to_string) else {
        return abort_flow(ctx, msg.chat_id, &msg.username, "add-admin").await;
    };

    let new_admin = msg.text.trim();
    let added = ctx.db.bots.add_admin(&bot_name, new_admin).await?;
    ctx.state.clear(msg.chat_id).await;

    let text = if added {
        log_admin_action(&msg.username, "add_admin", Some(&bot_name));
        format!("✅ @{} is now an admin of bot {}!", new_admin, bot_name)
    } else {
        format!("❌ @{} is already an admin of bot {}!", new_admin, bot_name)
    };
    let keyboard = render_main_menu(ctx, &msg.username).await?;
    send(ctx, msg.chat_id, &text, Some(keyboard)).await;
    Ok(())
}

/// Entry point of the remove-admin flow. Short-circuits when the bot has
/// no admins at all.
pub async fn handle_remove_admin_trigger(
    ctx: &AppContext,
    chat_id: i64,
    username: &str,
    bot_name: &str,
) -> Result<()> {
    if !ctx.auth.can_manage(username).await? {
        send(ctx, chat_id, NO_PERMISSION, None).await;
        return Ok(());
    }

    let admins = ctx.db.bots.list_admins(bot_name).await?;
    if admins.is_empty() {
        send(
            ctx,
            chat_id,
            &format!("Bot {} has no admins.", bot_name),
            Some(keyboards::admin_actions(bot_name)),
        )
        .await;
        return Ok(());
    }

    ctx.state
        .set(
            ConversationContext::new(chat_id, FlowStep::WaitingForAdminToRemove)
                .with_data(KEY_BOT_NAME, bot_name),
        )
        .await;
    send(
        ctx,
        chat_id,
        &format!("Enter the username of the admin to remove from bot {}:", bot_name),
        Some(keyboards::back_button()),
    )
    .await;
    Ok(())
}

/// The username to revoke arrived: commit the removal.
pub async fn handle_admin_to_remove_input(
    ctx: &AppContext,
    msg: &IncomingMessage,
    context: &ConversationContext,
) -> Result<()> {
    let Some(bot_name) = context.get(KEY_BOT_NAME).map(str::to_string) else {
        return abort_flow(ctx, msg.chat_id, &msg.username, "remove-admin").await;
    };

    let admin = msg.text.trim();
    let removed = ctx.db.bots.remove_admin(&bot_name, admin).await?;
    ctx.state.clear(msg.chat_id).await;

    let text = if removed {
        log_admin_action(&msg.username, "remove_admin", Some(&bot_name));
        format!("✅ @{} removed from the admins of bot {}!", admin, bot_name)
    } else {
        format!("❌ @{} is not an admin of bot {}!", admin, bot_name)
    };
    let keyboard = render_main_menu(ctx, &msg.username).await?;
    send(ctx, msg.chat_id, &text, Some(keyboard)).await;
    Ok(())
}
