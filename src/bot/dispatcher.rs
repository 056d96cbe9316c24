//! Routes incoming chat text to the matching command handler

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::command_handlers::{self, CommandOutcome};
use super::transport::{ChatTransport, ConversationId};
use super::HandlerContext;
use crate::commands;
use crate::config::BotConfig;
use crate::db::RecipeStore;
use crate::errors::error_logging;
use crate::observability;

/// A message as seen by the dispatcher, independent of the chat platform
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub conversation: ConversationId,
    /// Display handle of the author, without a leading `@`
    pub sender: String,
    /// `None` for stickers, photos and other non-text content
    pub text: Option<String>,
}

/// Dispatcher knobs taken from [`BotConfig`]
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub command_prefix: String,
    pub random_sample_size: usize,
}

impl From<&BotConfig> for DispatchSettings {
    fn from(config: &BotConfig) -> Self {
        Self {
            command_prefix: config.command_prefix.clone(),
            random_sample_size: config.random_sample_size,
        }
    }
}

/// Owns the store and transport handles shared by every handler
pub struct CommandDispatcher {
    store: Arc<dyn RecipeStore>,
    transport: Arc<dyn ChatTransport>,
    settings: DispatchSettings,
}

impl CommandDispatcher {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        transport: Arc<dyn ChatTransport>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            store,
            transport,
            settings,
        }
    }

    /// Handle one incoming message.
    ///
    /// Never fails: problems are either reported in the conversation or
    /// logged, and the next message is processed normally.
    pub async fn dispatch(&self, message: &InboundMessage) {
        let Some(text) = message.text.as_deref() else {
            debug!(conversation = %message.conversation.0, "Skipping non-text message");
            return;
        };

        let Some(spec) = commands::classify(text, &self.settings.command_prefix) else {
            debug!(
                conversation = %message.conversation.0,
                sender = %message.sender,
                "Ignoring message without a known command"
            );
            return;
        };

        info!(
            command = spec.name,
            sender = %message.sender,
            conversation = %message.conversation.0,
            "Processing command"
        );

        let ctx = HandlerContext {
            store: self.store.as_ref(),
            transport: self.transport.as_ref(),
            settings: &self.settings,
            conversation: message.conversation,
            sender: &message.sender,
        };

        let start = Instant::now();
        let outcome = match spec.parse(text) {
            Ok(command) => command_handlers::handle_command(&ctx, command).await,
            Err(e) => {
                error_logging::log_validation_error(
                    &e,
                    spec.kind.as_str(),
                    &message.sender,
                    Some(text),
                );
                ctx.reply(e.user_message()).await;
                CommandOutcome::Rejected
            }
        };

        observability::record_command_metrics(spec.kind.as_str(), outcome.as_str(), start.elapsed());
        debug!(command = spec.name, outcome = outcome.as_str(), "Command finished");
    }
}
