//! /start and /me command handlers

use tracing::info;

use crate::state::AppContext;
use crate::utils::errors::Result;

use super::super::messages::IncomingMessage;
use super::super::{render_main_menu, send, ACCESS_DENIED};

/// Handle /start: register the user on first contact, then gate.
pub async fn handle_start(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    if !msg.username.is_empty() {
        ctx.db
            .register_user(&msg.username, msg.user_id, msg.first_name.as_deref())
            .await?;
    }

    if !ctx.auth.is_allowed(&msg.username, msg.user_id).await? {
        send(ctx, msg.chat_id, ACCESS_DENIED, None).await;
        return Ok(());
    }

    info!(username = %msg.username, "User started the console");

    let visible = ctx.auth.visible_bots(&msg.username).await?;
    let keyboard = render_main_menu(ctx, &msg.username).await?;
    let text = if visible.is_empty() {
        "👋 Welcome to NS Logger!\n\n❌ You don't have access to any bot yet.\nContact a system operator to be granted access."
    } else {
        "👋 Welcome to NS Logger!\n\nChoose a bot to view its logs, or pick an action:"
    };
    send(ctx, msg.chat_id, text, Some(keyboard)).await;
    Ok(())
}

/// Handle /me: show the requesting user's profile card.
pub async fn handle_me(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    if !ctx.auth.is_allowed(&msg.username, msg.user_id).await? {
        send(ctx, msg.chat_id, ACCESS_DENIED, None).await;
        return Ok(());
    }

    let Some(user) = ctx.db.users.find_by_username(&msg.username).await? else {
        send(ctx, msg.chat_id, ACCESS_DENIED, None).await;
        return Ok(());
    };

    let rank = ctx.auth.rank(&msg.username).await?;
    let mut text = format!(
        "👤 User info\n\n📧 Username: @{}\n👨‍💼 Rank: {}\n🆔 ID: {}\n📛 Name: {}",
        user.username,
        rank.label(),
        user.user_id,
        user.first_name.as_deref().unwrap_or("N/A"),
    );

    if rank < crate::models::Rank::Gadmin {
        let banned = if user.banned { "❌ Yes" } else { "✅ No" };
        text.push_str(&format!(
            "\n📊 Restricted: {}\n💢 Warnings: {}/{}",
            banned, user.warns, ctx.settings.bot.max_warns
        ));
    }

    let keyboard = render_main_menu(ctx, &msg.username).await?;
    send(ctx, msg.chat_id, &text, Some(keyboard)).await;
    Ok(())
}
