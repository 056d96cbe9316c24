//! # Application Error Types
//!
//! This module defines the error taxonomy used throughout the bot.
//! Store failures stay `anyhow::Error` and are logged where they surface;
//! lookups that find nothing return `Ok(None)` rather than an error.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Malformed or missing command arguments; the message is shown to the user
    Validation(String),
}

impl AppError {
    /// Text that may be shown in the chat for this error.
    ///
    /// Only validation messages are passed through verbatim; configuration
    /// details never leave the process.
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Validation(msg) => msg,
            AppError::Config(_) => "something went wrong",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::{error, warn};

    /// Log database operation errors with contextual information
    pub fn log_database_error(
        error: &impl std::fmt::Display,
        operation: &str,
        additional_context: Option<&[(&str, &dyn std::fmt::Display)]>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            additional_context = ?additional_context.map(|ctx| ctx.iter().map(|(k,v)| format!("{}={}", k, v)).collect::<Vec<_>>().join(", ")),
            "Database operation failed"
        );
    }

    /// Log recipe submission errors with recipe-specific context
    pub fn log_recipe_error(
        error: &impl std::fmt::Display,
        operation: &str,
        author: &str,
        drink_name: Option<&str>,
        ingredient_count: Option<usize>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            author = %author,
            drink_name = ?drink_name,
            ingredient_count = ?ingredient_count,
            "Recipe submission failed"
        );
    }

    /// Log outbound chat failures. These are never retried.
    pub fn log_transport_error(
        error: &impl std::fmt::Display,
        operation: &str,
        conversation: Option<i64>,
    ) {
        warn!(
            error = %error,
            operation = %operation,
            conversation = ?conversation,
            "Chat transport operation failed"
        );
    }

    /// Log validation errors with input context
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        sender: &str,
        input_value: Option<&str>,
    ) {
        warn!(
            error = %error,
            operation = %operation,
            sender = %sender,
            input_value = ?input_value.map(|v| if v.len() > 100 { format!("{}...", truncate(v, 100)) } else { v.to_string() }),
            "Validation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }

    fn truncate(value: &str, max: usize) -> &str {
        match value.char_indices().nth(max) {
            Some((idx, _)) => &value[..idx],
            None => value,
        }
    }
}
