//! Message dispatch
//!
//! Inbound text is routed by the chat's conversation state first; only an
//! idle chat has its text matched against menu buttons. The back label
//! cancels any flow uniformly, before state routing. Each dispatch is
//! fault-isolated so one chat's malformed input cannot take down message
//! processing for other chats.

use tracing::{debug, error, warn};

use crate::handlers::actions::{parse_menu_action, MenuAction, BTN_BACK};
use crate::handlers::commands::{admins, bots, settings};
use crate::handlers::{render_main_menu, send, ACCESS_DENIED};
use crate::state::{AppContext, FlowStep};
use crate::utils::errors::Result;

/// Inbound text message as delivered by the transport
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    /// Platform handle; empty when the platform supplied none
    pub username: String,
    pub user_id: i64,
    pub first_name: Option<String>,
    pub text: String,
}

/// Fault-isolating entry point used by the transport layer.
pub async fn dispatch_message(ctx: &AppContext, msg: IncomingMessage) {
    if let Err(e) = handle_message(ctx, &msg).await {
        error!(
            chat_id = msg.chat_id,
            username = %msg.username,
            severity = %e.severity(),
            error = %e,
            "Message handler failed"
        );
        ctx.state.clear(msg.chat_id).await;
        send(
            ctx,
            msg.chat_id,
            "❌ Something went wrong. Back to the main menu.",
            Some(crate::handlers::keyboards::main_menu()),
        )
        .await;
    }
}

/// Route one inbound message.
pub async fn handle_message(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    if !msg.username.is_empty() {
        // Auto-registration on first contact; existing records are untouched.
        ctx.db
            .register_user(&msg.username, msg.user_id, msg.first_name.as_deref())
            .await?;
    }

    if !ctx.auth.is_allowed(&msg.username, msg.user_id).await? {
        send(ctx, msg.chat_id, ACCESS_DENIED, None).await;
        return Ok(());
    }

    // Uniform cancel: back wins over any state.
    if msg.text == BTN_BACK {
        ctx.state.clear(msg.chat_id).await;
        let keyboard = render_main_menu(ctx, &msg.username).await?;
        send(ctx, msg.chat_id, "Main menu:", Some(keyboard)).await;
        return Ok(());
    }

    if let Some(context) = ctx.state.get(msg.chat_id).await {
        debug!(chat_id = msg.chat_id, step = ?context.step, "Routing by conversation state");
        return match context.step {
            FlowStep::WaitingForBotName => bots::handle_bot_name_input(ctx, msg).await,
            FlowStep::WaitingForLogPath => bots::handle_log_path_input(ctx, msg, &context).await,
            FlowStep::WaitingForNewAdmin => admins::handle_new_admin_input(ctx, msg, &context).await,
            FlowStep::WaitingForAdminToRemove => {
                admins::handle_admin_to_remove_input(ctx, msg, &context).await
            }
            FlowStep::AdminManagement => match parse_menu_action(&msg.text) {
                MenuAction::SelectBot(bot) => {
                    admins::handle_admin_bot_selected(ctx, msg, &bot).await
                }
                _ => {
                    // Not a bot selection; drop out of the flow and handle
                    // the message as a menu command.
                    ctx.state.clear(msg.chat_id).await;
                    handle_idle_message(ctx, msg).await
                }
            },
            FlowStep::ConfirmBotRemoval => {
                bots::handle_confirm_removal_input(ctx, msg, &context).await
            }
            FlowStep::WaitingForGlobalAdmins => {
                settings::handle_global_admins_input(ctx, msg).await
            }
        };
    }

    handle_idle_message(ctx, msg).await
}

/// Idle routing: match the literal menu-button text.
async fn handle_idle_message(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    match parse_menu_action(&msg.text) {
        MenuAction::BotList => bots::handle_bot_list(ctx, msg).await,
        MenuAction::AddBot => bots::handle_add_bot_trigger(ctx, msg).await,
        MenuAction::AdminManagement => admins::handle_admin_management(ctx, msg).await,
        MenuAction::Settings => settings::handle_settings(ctx, msg).await,
        MenuAction::GlobalAdmins => settings::handle_global_admins_trigger(ctx, msg).await,
        MenuAction::Statistics => settings::handle_statistics(ctx, msg).await,
        MenuAction::SelectBot(bot) => bots::handle_bot_selected(ctx, msg, &bot).await,
        MenuAction::Refresh => {
            let keyboard = render_main_menu(ctx, &msg.username).await?;
            send(ctx, msg.chat_id, "🔄 Bot list refreshed!", Some(keyboard)).await;
            Ok(())
        }
        MenuAction::Back => {
            // Back is normally intercepted before routing; degrade to the
            // same behavior if it ever reaches here.
            ctx.state.clear(msg.chat_id).await;
            let keyboard = render_main_menu(ctx, &msg.username).await?;
            send(ctx, msg.chat_id, "Main menu:", Some(keyboard)).await;
            Ok(())
        }
        MenuAction::Unknown => {
            warn!(chat_id = msg.chat_id, text = %msg.text, "Unknown menu input");
            let keyboard = render_main_menu(ctx, &msg.username).await?;
            send(
                ctx,
                msg.chat_id,
                "❌ Unknown command.\n\nUse the keyboard buttons to interact with the console.",
                Some(keyboard),
            )
            .await;
            Ok(())
        }
    }
}
