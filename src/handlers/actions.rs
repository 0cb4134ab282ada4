//! Transport-boundary action parsing
//!
//! Button labels and callback payloads are parsed into tagged variants in
//! this one place; the rest of the crate dispatches on the variants and
//! never on raw string prefixes. The `:` callback delimiter is reserved,
//! which is why bot names are validated on entry.

use std::sync::OnceLock;

use regex::Regex;

// Menu button labels
pub const BTN_BOT_LIST: &str = "📋 Bot list";
pub const BTN_ADD_BOT: &str = "➕ Add bot";
pub const BTN_ADMIN_MANAGEMENT: &str = "👥 Manage admins";
pub const BTN_SETTINGS: &str = "⚙️ Settings";
pub const BTN_BACK: &str = "🔙 Back";
pub const BTN_REFRESH: &str = "🔄 Refresh";
pub const BTN_GLOBAL_ADMINS: &str = "👥 Manage global admins";
pub const BTN_STATISTICS: &str = "📊 Statistics";
pub const BTN_CANCEL: &str = "❌ Cancel";

/// Prefix decorating bot-selection buttons
pub const BOT_PREFIX: &str = "🤖 ";

/// Menu actions recognized while a chat is idle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    BotList,
    AddBot,
    AdminManagement,
    Settings,
    Back,
    Refresh,
    GlobalAdmins,
    Statistics,
    SelectBot(String),
    Unknown,
}

/// Parse an idle-state text message into a menu action
pub fn parse_menu_action(text: &str) -> MenuAction {
    match text {
        BTN_BOT_LIST => MenuAction::BotList,
        BTN_ADD_BOT => MenuAction::AddBot,
        BTN_ADMIN_MANAGEMENT => MenuAction::AdminManagement,
        BTN_SETTINGS => MenuAction::Settings,
        BTN_BACK => MenuAction::Back,
        BTN_REFRESH => MenuAction::Refresh,
        BTN_GLOBAL_ADMINS => MenuAction::GlobalAdmins,
        BTN_STATISTICS => MenuAction::Statistics,
        _ => match text.strip_prefix(BOT_PREFIX) {
            Some(name) if !name.is_empty() => MenuAction::SelectBot(name.to_string()),
            _ => MenuAction::Unknown,
        },
    }
}

/// Actions carried in inline-keyboard callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    LogTail { bot: String, lines: usize },
    Download { bot: String },
    Watch { bot: String },
    Unwatch { bot: String },
    ListAdmins { bot: String },
    AddAdmin { bot: String },
    RemoveAdmin { bot: String },
    RemoveBot { bot: String },
}

impl CallbackAction {
    /// Encode into the wire form `action:bot[:param]`
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::LogTail { bot, lines } => format!("log:{}:{}", bot, lines),
            CallbackAction::Download { bot } => format!("download:{}", bot),
            CallbackAction::Watch { bot } => format!("watch:{}", bot),
            CallbackAction::Unwatch { bot } => format!("unwatch:{}", bot),
            CallbackAction::ListAdmins { bot } => format!("admins:{}", bot),
            CallbackAction::AddAdmin { bot } => format!("admin_add:{}", bot),
            CallbackAction::RemoveAdmin { bot } => format!("admin_del:{}", bot),
            CallbackAction::RemoveBot { bot } => format!("remove:{}", bot),
        }
    }
}

/// Parse callback data; `None` for anything malformed.
pub fn parse_callback_action(data: &str) -> Option<CallbackAction> {
    let mut parts = data.splitn(3, ':');
    let action = parts.next()?;
    let bot = parts.next()?.to_string();
    if bot.is_empty() {
        return None;
    }
    let param = parts.next();

    match (action, param) {
        ("log", Some(lines)) => {
            let lines = lines.parse().ok()?;
            Some(CallbackAction::LogTail { bot, lines })
        }
        ("download", None) => Some(CallbackAction::Download { bot }),
        ("watch", None) => Some(CallbackAction::Watch { bot }),
        ("unwatch", None) => Some(CallbackAction::Unwatch { bot }),
        ("admins", None) => Some(CallbackAction::ListAdmins { bot }),
        ("admin_add", None) => Some(CallbackAction::AddAdmin { bot }),
        ("admin_del", None) => Some(CallbackAction::RemoveAdmin { bot }),
        ("remove", None) => Some(CallbackAction::RemoveBot { bot }),
        _ => None,
    }
}

/// Bot names double as primary keys and callback-data segments, so the
/// callback delimiter (and anything else exotic) is rejected up front.
pub fn is_valid_bot_name(name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").expect("bot name pattern is well-formed")
    });
    pattern.is_match(name)
}

/// Platform username shape; keeps button labels and other junk out of the
/// wholesale global-admin replace.
pub fn is_valid_username(name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]{1,32}$").expect("username pattern is well-formed")
    });
    pattern.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_buttons() {
        assert_eq!(parse_menu_action(BTN_ADD_BOT), MenuAction::AddBot);
        assert_eq!(parse_menu_action(BTN_BACK), MenuAction::Back);
        assert_eq!(
            parse_menu_action("🤖 alpha"),
            MenuAction::SelectBot("alpha".to_string())
        );
        assert_eq!(parse_menu_action("hello there"), MenuAction::Unknown);
        assert_eq!(parse_menu_action("🤖 "), MenuAction::Unknown);
    }

    #[test]
    fn callback_round_trip() {
        let actions = [
            CallbackAction::LogTail { bot: "alpha".to_string(), lines: 20 },
            CallbackAction::Download { bot: "alpha".to_string() },
            CallbackAction::Watch { bot: "beta".to_string() },
            CallbackAction::Unwatch { bot: "beta".to_string() },
            CallbackAction::ListAdmins { bot: "gamma".to_string() },
            CallbackAction::AddAdmin { bot: "gamma".to_string() },
            CallbackAction::RemoveAdmin { bot: "gamma".to_string() },
            CallbackAction::RemoveBot { bot: "alpha".to_string() },
        ];
        for action in actions {
            assert_eq!(parse_callback_action(&action.encode()), Some(action));
        }
    }

    #[test]
    fn rejects_malformed_callbacks() {
        assert_eq!(parse_callback_action(""), None);
        assert_eq!(parse_callback_action("log"), None);
        assert_eq!(parse_callback_action("log:"), None);
        assert_eq!(parse_callback_action("log:alpha:many"), None);
        assert_eq!(parse_callback_action("teleport:alpha"), None);
        assert_eq!(parse_callback_action("download:alpha:extra"), None);
    }

    #[test]
    fn validates_bot_names() {
        assert!(is_valid_bot_name("alpha"));
        assert!(is_valid_bot_name("svc-bot_2.prod"));
        assert!(!is_valid_bot_name(""));
        assert!(!is_valid_bot_name("has space"));
        assert!(!is_valid_bot_name("has:colon"));
        assert!(!is_valid_bot_name(&"x".repeat(65)));
    }
}
