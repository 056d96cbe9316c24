use anyhow::{Context, Result};
use bottender::bot::{self, ChatTransport, CommandDispatcher, ConversationId, DispatchSettings};
use bottender::config::AppConfig;
use bottender::db::{self, PgRecipeStore};
use bottender::errors::error_logging;
use bottender::observability;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::info;

const STARTUP_ANNOUNCEMENT: &str = "I'm running.";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| {
        error_logging::log_config_error(&e, "environment", "load_config");
        anyhow::anyhow!("{}", e)
    })?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    // Initialize logging and metrics
    observability::init_observability_with_config(&config.observability)?;
    info!(summary = %config.summary(), "Configuration loaded");

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .max_lifetime(config.database.max_lifetime_secs.map(Duration::from_secs))
        .idle_timeout(config.database.idle_timeout_secs.map(Duration::from_secs))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    // Initialize database schema
    db::init_database_schema(&pool).await?;

    let store = Arc::new(PgRecipeStore::new(Arc::new(pool)));

    // Initialize the bot with custom client configuration for better reliability
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.bot.http_timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    let telegram = Bot::with_client(config.bot.token.clone(), client);
    let transport = Arc::new(bot::TelegramTransport::new(
        telegram.clone(),
        config.bot.broadcast_chat_id.map(ChatId),
    ));

    if let Some(chat_id) = config.bot.announcement_chat_id {
        transport
            .send_message(ConversationId(chat_id), STARTUP_ANNOUNCEMENT)
            .await
            .context("Failed to send startup announcement")?;
    }

    let dispatcher = Arc::new(CommandDispatcher::new(
        store,
        transport,
        DispatchSettings::from(&config.bot),
    ));

    info!(
        http_timeout_secs = config.bot.http_timeout_secs,
        command_prefix = %config.bot.command_prefix,
        "Bot initialized, starting dispatcher"
    );

    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let dispatcher = Arc::clone(&dispatcher);
        move |msg: Message| {
            let dispatcher = Arc::clone(&dispatcher);
            async move { bot::message_handler(msg, dispatcher).await }
        }
    }));

    Dispatcher::builder(telegram, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
