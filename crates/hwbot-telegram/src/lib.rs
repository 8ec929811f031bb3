//! Telegram adapter (teloxide).
//!
//! This crate implements the `hwbot-core` MessagingPort over Telegram Bot API.

use async_trait::async_trait;

use teloxide::prelude::*;

use hwbot_core::{domain::ChatId, errors::Error, ports::MessagingPort, Result};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Bot::new(token))
    }

    /// Bot username via `getMe`, if Telegram answers.
    pub async fn username(&self) -> Option<String> {
        match self.bot.get_me().await {
            Ok(me) => Some(me.username().to_string()),
            Err(e) => {
                tracing::warn!("telegram getMe failed: {e}");
                None
            }
        }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::NotificationFailure(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.bot
            .send_message(Self::tg_chat(chat_id), text.to_string())
            .await
            .map_err(Self::map_err)?;
        tracing::debug!(chat_id = chat_id.0, "message sent");
        Ok(())
    }
}
