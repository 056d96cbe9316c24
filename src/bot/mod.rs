//! Bot module for handling chat interactions
//!
//! This module is split into several submodules:
//! - `transport`: the outbound chat seam and its Telegram implementation
//! - `dispatcher`: classifies incoming text and routes it to a handler
//! - `command_handlers`: one handler per command
//! - `message_handler`: adapts teloxide messages for the dispatcher

pub mod command_handlers;
pub mod dispatcher;
pub mod message_handler;
pub mod transport;

use crate::db::RecipeStore;
use crate::errors::error_logging;
use crate::observability;

pub use dispatcher::{CommandDispatcher, DispatchSettings, InboundMessage};
pub use message_handler::message_handler;
pub use transport::{ChatTransport, ConversationId, TelegramTransport};

/// Common context for command handlers containing shared dependencies
pub struct HandlerContext<'a> {
    pub store: &'a dyn RecipeStore,
    pub transport: &'a dyn ChatTransport,
    pub settings: &'a DispatchSettings,
    pub conversation: ConversationId,
    pub sender: &'a str,
}

impl HandlerContext<'_> {
    /// Send to the requesting conversation. Failures are logged and swallowed.
    pub async fn reply(&self, text: &str) {
        if let Err(e) = self.transport.send_message(self.conversation, text).await {
            error_logging::log_transport_error(&e, "send_message", Some(self.conversation.0));
            observability::record_transport_failure("send");
        }
    }

    /// Send to the broadcast audience. Failures are logged and swallowed.
    pub async fn broadcast(&self, text: &str) {
        if let Err(e) = self.transport.broadcast(text).await {
            error_logging::log_transport_error(&e, "broadcast", None);
            observability::record_transport_failure("broadcast");
        }
    }
}
