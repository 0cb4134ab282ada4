//! Settings menu: statistics and global-admin management

use crate::state::{AppContext, ConversationContext, FlowStep};
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

use super::super::actions::is_valid_username;
use super::super::keyboards;
use super::super::messages::IncomingMessage;
use super::super::{send, NO_PERMISSION};

/// Show the settings menu
pub async fn handle_settings(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    if !ctx.auth.can_manage(&msg.username).await? {
        send(ctx, msg.chat_id, NO_PERMISSION, None).await;
        return Ok(());
    }

    send(
        ctx,
        msg.chat_id,
        "⚙️ Console settings\n\nChoose an action:",
        Some(keyboards::settings_menu()),
    )
    .await;
    Ok(())
}

/// Show the statistics card
pub async fn handle_statistics(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    if !ctx.auth.can_manage(&msg.username).await? {
        send(ctx, msg.chat_id, NO_PERMISSION, None).await;
        return Ok(());
    }

    let stats = ctx.db.statistics().await?;
    let text = format!(
        "📊 Console statistics\n\n• Bots registered: {}\n• Local admin assignments: {}\n• Global admins: {}\n• Operators: {}\n• Known users: {}",
        stats.bots, stats.admin_assignments, stats.global_admins, stats.operators, stats.users
    );
    send(ctx, msg.chat_id, &text, Some(keyboards::settings_menu())).await;
    Ok(())
}

/// Entry point of the global-admins edit flow
pub async fn handle_global_admins_trigger(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    if !ctx.auth.can_manage(&msg.username).await? {
        send(ctx, msg.chat_id, NO_PERMISSION, None).await;
        return Ok(());
    }

    let current = ctx.db.roles.list_global_admins().await?;
    let current_text = if current.is_empty() {
        "(none)".to_string()
    } else {
        current
            .iter()
            .map(|admin| format!("@{}", admin))
            .collect::<Vec<_>>()
            .join(", ")
    };

    ctx.state
        .set(ConversationContext::new(msg.chat_id, FlowStep::WaitingForGlobalAdmins))
        .await;
    send(
        ctx,
        msg.chat_id,
        &format!(
            "Current global admins:\n{}\n\nSend the new list separated by commas (usernames only, without @):",
            current_text
        ),
        Some(keyboards::back_button()),
    )
    .await;
    Ok(())
}

/// The replacement list arrived. This is a wholesale replace: the parsed
/// list becomes the entire global-admin set. An input that parses to
/// nothing backs out without committing.
pub async fn handle_global_admins_input(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    let new_admins: Vec<String> = msg
        .text
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(invalid) = new_admins.iter().find(|name| !is_valid_username(name)) {
        send(
            ctx,
            msg.chat_id,
            &format!(
                "❌ Invalid username: {}. Send the list again (usernames only, without @):",
                invalid
            ),
            Some(keyboards::back_button()),
        )
        .await;
        return Ok(());
    }

    ctx.state.clear(msg.chat_id).await;

    if new_admins.is_empty() {
        send(
            ctx,
            msg.chat_id,
            "❌ No usernames given, the global admin list is unchanged.",
            Some(keyboards::settings_menu()),
        )
        .await;
        return Ok(());
    }

    ctx.db.roles.replace_global_admins(&new_admins).await?;
    log_admin_action(&msg.username, "replace_global_admins", None);

    let list = new_admins
        .iter()
        .map(|admin| format!("@{}", admin))
        .collect::<Vec<_>>()
        .join(", ");
    send(
        ctx,
        msg.chat_id,
        &format!("✅ Global admin list updated:\n{}", list),
        Some(keyboards::settings_menu()),
    )
    .await;
    Ok(())
}
