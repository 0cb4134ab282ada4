//! Messaging gateway seam
//!
//! The core never talks to Telegram directly: handlers render results
//! through the [`MessagingGateway`] trait, and only this module (plus
//! `main.rs`) knows about teloxide. Sends are fire-and-forget from the
//! core's perspective; a failed delivery is logged by the caller and never
//! decides a state transition.

use std::path::Path;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, KeyboardButton,
    KeyboardMarkup, ParseMode, ReplyMarkup,
};

use crate::utils::errors::Result;

/// Transport-neutral keyboard description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Rows of plain buttons whose presses come back as text messages
    Reply(Vec<Vec<String>>),
    /// Rows of (label, callback data) buttons
    Inline(Vec<Vec<(String, String)>>),
}

/// Text rendering modes the console uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// Outbound boundary to the chat platform
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
        format: TextFormat,
    ) -> Result<()>;

    async fn send_document(&self, chat_id: i64, path: &Path, caption: &str) -> Result<()>;

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}

/// Production gateway backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn reply_markup(keyboard: Keyboard) -> ReplyMarkup {
        match keyboard {
            Keyboard::Reply(rows) => {
                let rows: Vec<Vec<KeyboardButton>> = rows
                    .into_iter()
                    .map(|row| row.into_iter().map(KeyboardButton::new).collect())
                    .collect();
                let mut markup = KeyboardMarkup::new(rows);
                markup.resize_keyboard = true;
                ReplyMarkup::Keyboard(markup)
            }
            Keyboard::Inline(rows) => {
                let rows: Vec<Vec<InlineKeyboardButton>> = rows
                    .into_iter()
                    .map(|row| {
                        row.into_iter()
                            .map(|(label, data)| InlineKeyboardButton::callback(label, data))
                            .collect()
                    })
                    .collect();
                ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows))
            }
        }
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
        format: TextFormat,
    ) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let TextFormat::Html = format {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(Self::reply_markup(keyboard));
        }
        request.await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: i64, path: &Path, caption: &str) -> Result<()> {
        self.bot
            .send_document(ChatId(chat_id), InputFile::file(path.to_path_buf()))
            .caption(caption.to_string())
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let mut request = self.bot.answer_callback_query(callback_id.to_string());
        if let Some(text) = text {
            request = request.text(text.to_string());
        }
        request.await?;
        Ok(())
    }
}
