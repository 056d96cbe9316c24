//! # Unified Application Configuration
//!
//! This module provides a centralized configuration system that consolidates
//! all application settings into a single, structured configuration object.
//! It supports loading from environment variables, validation, and provides
//! a clean interface for accessing configuration throughout the application.

use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use std::env;
use std::str::FromStr;

/// Bot-specific configuration settings
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,
    /// Leading word of every command, e.g. `!bottender`
    pub command_prefix: String,
    /// Chat that receives new-recipe announcements
    pub broadcast_chat_id: Option<i64>,
    /// Chat told "I'm running." at startup
    pub announcement_chat_id: Option<i64>,
    /// How many drinks the random command samples
    pub random_sample_size: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            http_timeout_secs: 30,
            command_prefix: "!bottender".to_string(),
            broadcast_chat_id: None,
            announcement_chat_id: None,
            random_sample_size: 10,
        }
    }
}

impl BotConfig {
    /// Validate bot configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.token.trim().is_empty() {
            return Err(AppError::Config("Bot token cannot be empty".to_string()));
        }

        // Basic bot token format validation
        let parts: Vec<&str> = self.token.split(':').collect();
        if parts.len() != 2 {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        }

        if parts[0].parse::<u64>().is_err() {
            return Err(AppError::Config(
                "Bot token bot ID must be numeric".to_string(),
            ));
        }

        if parts[1].len() < 20 {
            return Err(AppError::Config(
                "Bot token appears to be too short. Please verify it's a valid token".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        let prefix = self.command_prefix.trim();
        if prefix.is_empty() || prefix.contains(char::is_whitespace) {
            return Err(AppError::Config(
                "Command prefix must be a single non-empty word".to_string(),
            ));
        }

        if self.random_sample_size == 0 || self.random_sample_size > 50 {
            return Err(AppError::Config(
                "Random sample size must be between 1 and 50".to_string(),
            ));
        }

        Ok(())
    }
}

/// Database configuration settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Minimum number of idle connections
    pub min_connections: u32,
    /// Maximum lifetime of a connection in seconds
    pub max_lifetime_secs: Option<u64>,
    /// Maximum time a connection can be idle in seconds
    pub idle_timeout_secs: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            connect_timeout_secs: 30,
            min_connections: 1,
            max_lifetime_secs: Some(1800), // 30 minutes
            idle_timeout_secs: Some(600),  // 10 minutes
        }
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::Config("Database URL cannot be empty".to_string()));
        }

        if !self.url.starts_with("postgresql://") && !self.url.starts_with("postgres://") {
            return Err(AppError::Config(
                "Database URL must start with 'postgresql://' or 'postgres://'".to_string(),
            ));
        }

        let url_parts: Vec<&str> = self.url.split("://").collect();
        if url_parts.len() != 2 {
            return Err(AppError::Config(
                "Database URL format is invalid".to_string(),
            ));
        }

        if !url_parts[1].contains('@') {
            return Err(AppError::Config(
                "Database URL must contain authentication information".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(AppError::Config("Max connections cannot be 0".to_string()));
        }

        if self.max_connections > 100 {
            return Err(AppError::Config(
                "Max connections cannot be greater than 100".to_string(),
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(AppError::Config("Connect timeout cannot be 0".to_string()));
        }

        if self.connect_timeout_secs > 300 {
            return Err(AppError::Config(
                "Connect timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(AppError::Config(
                "Min connections cannot be greater than max connections".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Bot configuration
    pub bot: BotConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

/// Parse an optional environment variable, falling back to `default` when unset
fn env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid value", key))),
        Err(_) => Ok(default),
    }
}

/// Parse an optional chat id; unset or empty means "not configured"
fn env_chat_id(key: &str) -> AppResult<Option<i64>> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} must be a numeric chat id", key))),
        _ => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        // Load bot configuration
        config.bot.token = env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
            AppError::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        config.bot.http_timeout_secs = env_or("HTTP_CLIENT_TIMEOUT_SECS", 30)?;
        config.bot.command_prefix = env::var("BOT_COMMAND_PREFIX")
            .unwrap_or_else(|_| config.bot.command_prefix.clone());
        config.bot.broadcast_chat_id = env_chat_id("BOT_BROADCAST_CHAT_ID")?;
        config.bot.announcement_chat_id = env_chat_id("BOT_ANNOUNCEMENT_CHAT_ID")?;
        config.bot.random_sample_size = env_or("RANDOM_SAMPLE_SIZE", 10)?;

        // Load database configuration
        config.database.url = env::var("DATABASE_URL").map_err(|_| {
            AppError::Config("DATABASE_URL environment variable is required".to_string())
        })?;
        config.database.max_connections = env_or("DATABASE_MAX_CONNECTIONS", 10)?;
        config.database.connect_timeout_secs = env_or("DATABASE_CONNECT_TIMEOUT_SECS", 30)?;
        config.database.min_connections = env_or("DATABASE_MIN_CONNECTIONS", 1)?;

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.bot.validate()?;
        self.database.validate()?;
        self.observability.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: bot_token=[REDACTED], db_url=[REDACTED], command_prefix={}, broadcast_chat={:?}, random_sample_size={}, metrics_port={}, environment={}",
            self.bot.command_prefix,
            self.bot.broadcast_chat_id,
            self.bot.random_sample_size,
            self.observability.metrics_port,
            self.observability.environment
        )
    }
}
