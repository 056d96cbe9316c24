//! Outbound side of the chat: per-conversation sends and audience broadcasts

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::debug;

/// Identifier of the conversation a message arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationId(pub i64);

impl From<ChatId> for ConversationId {
    fn from(chat_id: ChatId) -> Self {
        ConversationId(chat_id.0)
    }
}

/// Delivery of outbound text. Each call succeeds or fails on its own.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, conversation: ConversationId, text: &str) -> Result<()>;

    /// Send to the wider audience rather than the requesting conversation
    async fn broadcast(&self, text: &str) -> Result<()>;
}

/// Telegram delivery through teloxide
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    bot: Bot,
    broadcast_chat: Option<ChatId>,
}

impl TelegramTransport {
    pub fn new(bot: Bot, broadcast_chat: Option<ChatId>) -> Self {
        Self {
            bot,
            broadcast_chat,
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(&self, conversation: ConversationId, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(conversation.0), text.to_string())
            .await?;
        debug!(conversation = %conversation.0, message_length = text.len(), "Message sent");
        Ok(())
    }

    async fn broadcast(&self, text: &str) -> Result<()> {
        let chat_id = self
            .broadcast_chat
            .ok_or_else(|| anyhow!("no broadcast chat configured"))?;
        self.bot.send_message(chat_id, text.to_string()).await?;
        debug!(chat_id = %chat_id, "Broadcast sent");
        Ok(())
    }
}
