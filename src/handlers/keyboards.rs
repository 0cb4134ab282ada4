//! Keyboard builders
//!
//! All keyboards the console renders, built on the transport-neutral
//! [`Keyboard`] type. Labels come from `actions.rs` so the parser and the
//! keyboards can never drift apart.

use crate::services::Keyboard;

use super::actions::{
    CallbackAction, BOT_PREFIX, BTN_ADD_BOT, BTN_ADMIN_MANAGEMENT, BTN_BACK, BTN_BOT_LIST,
    BTN_CANCEL, BTN_GLOBAL_ADMINS, BTN_REFRESH, BTN_SETTINGS, BTN_STATISTICS,
};

/// Main menu
pub fn main_menu() -> Keyboard {
    Keyboard::Reply(vec![
        vec![BTN_BOT_LIST.to_string(), BTN_ADD_BOT.to_string()],
        vec![BTN_ADMIN_MANAGEMENT.to_string(), BTN_SETTINGS.to_string()],
        vec![BTN_REFRESH.to_string()],
    ])
}

/// Lone back button shown while a flow waits for input
pub fn back_button() -> Keyboard {
    Keyboard::Reply(vec![vec![BTN_BACK.to_string()]])
}

/// Bot selection list, two bots per row
pub fn bot_list(bots: &[String]) -> Keyboard {
    let mut rows: Vec<Vec<String>> = bots
        .chunks(2)
        .map(|chunk| chunk.iter().map(|name| format!("{}{}", BOT_PREFIX, name)).collect())
        .collect();
    rows.push(vec![BTN_BACK.to_string()]);
    Keyboard::Reply(rows)
}

/// Per-bot log and lifecycle actions
pub fn bot_actions(bot: &str) -> Keyboard {
    let bot = bot.to_string();
    Keyboard::Inline(vec![
        vec![
            (
                "📃 20 lines".to_string(),
                CallbackAction::LogTail { bot: bot.clone(), lines: 20 }.encode(),
            ),
            (
                "📋 50 lines".to_string(),
                CallbackAction::LogTail { bot: bot.clone(), lines: 50 }.encode(),
            ),
        ],
        vec![
            (
                "📥 Download logs".to_string(),
                CallbackAction::Download { bot: bot.clone() }.encode(),
            ),
            (
                "🔍 Watch live".to_string(),
                CallbackAction::Watch { bot: bot.clone() }.encode(),
            ),
        ],
        vec![
            (
                "⏹ Stop watching".to_string(),
                CallbackAction::Unwatch { bot: bot.clone() }.encode(),
            ),
            (
                "❌ Remove bot".to_string(),
                CallbackAction::RemoveBot { bot }.encode(),
            ),
        ],
    ])
}

/// Per-bot admin management actions
pub fn admin_actions(bot: &str) -> Keyboard {
    let bot = bot.to_string();
    Keyboard::Inline(vec![
        vec![(
            "👥 List admins".to_string(),
            CallbackAction::ListAdmins { bot: bot.clone() }.encode(),
        )],
        vec![
            (
                "➕ Add admin".to_string(),
                CallbackAction::AddAdmin { bot: bot.clone() }.encode(),
            ),
            (
                "➖ Remove admin".to_string(),
                CallbackAction::RemoveAdmin { bot }.encode(),
            ),
        ],
    ])
}

/// The exact affirmative label a removal confirmation must echo back
pub fn confirm_removal_label(bot: &str) -> String {
    format!("✅ Yes, remove {}", bot)
}

/// Yes/no keyboard for the destructive remove-bot flow
pub fn confirm_removal(bot: &str) -> Keyboard {
    Keyboard::Reply(vec![
        vec![confirm_removal_label(bot)],
        vec![BTN_CANCEL.to_string()],
    ])
}

/// Settings menu
pub fn settings_menu() -> Keyboard {
    Keyboard::Reply(vec![
        vec![BTN_GLOBAL_ADMINS.to_string()],
        vec![BTN_STATISTICS.to_string()],
        vec![BTN_BACK.to_string()],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_list_chunks_two_per_row() {
        let bots = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let Keyboard::Reply(rows) = bot_list(&bots) else {
            panic!("expected reply keyboard");
        };
        assert_eq!(rows[0], vec!["🤖 a", "🤖 b"]);
        assert_eq!(rows[1], vec!["🤖 c"]);
        assert_eq!(rows[2], vec![BTN_BACK]);
    }

    #[test]
    fn confirm_label_embeds_bot_name() {
        assert!(confirm_removal_label("alpha").contains("alpha"));
    }
}
