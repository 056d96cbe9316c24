//! Message Handler module for processing incoming Telegram messages

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::User;
use tracing::Instrument;

use super::dispatcher::{CommandDispatcher, InboundMessage};
use super::transport::ConversationId;
use crate::observability;

/// teloxide endpoint for every incoming message
pub async fn message_handler(msg: Message, dispatcher: Arc<CommandDispatcher>) -> Result<()> {
    let inbound = inbound_from_telegram(&msg);

    let message_type = if inbound.text.is_some() { "text" } else { "other" };
    observability::record_telegram_message(message_type);

    dispatcher
        .dispatch(&inbound)
        .instrument(observability::telegram_span("message_handler", msg.chat.id.0))
        .await;

    Ok(())
}

/// Convert a teloxide message into the platform-independent form
pub fn inbound_from_telegram(msg: &Message) -> InboundMessage {
    InboundMessage {
        conversation: ConversationId::from(msg.chat.id),
        sender: sender_handle(msg.from.as_ref()),
        text: msg.text().map(str::to_string),
    }
}

/// Username when set, otherwise first name, otherwise the numeric id
pub fn sender_handle(user: Option<&User>) -> String {
    match user {
        Some(user) => author_handle(user.username.as_deref(), &user.first_name, user.id.0),
        None => "unknown".to_string(),
    }
}

fn author_handle(username: Option<&str>, first_name: &str, id: u64) -> String {
    match username {
        Some(username) if !username.is_empty() => username.to_string(),
        _ if !first_name.is_empty() => first_name.to_string(),
        _ => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_prefers_username() {
        assert_eq!(author_handle(Some("mixologist"), "Ada", 42), "mixologist");
    }

    #[test]
    fn test_sender_falls_back_to_first_name_then_id() {
        assert_eq!(author_handle(None, "Ada", 42), "Ada");
        assert_eq!(author_handle(Some(""), "", 42), "42");
        assert_eq!(sender_handle(None), "unknown");
    }
}
