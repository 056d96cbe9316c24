//! Observability module for centralized logging and metrics setup.
//!
//! This module provides:
//! - Structured logging with configurable levels (pretty or JSON)
//! - Prometheus metrics export
//! - Span and metric helpers used by the store and the dispatcher

use std::net::SocketAddr;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;

/// Initialize logging and metrics with custom configuration
pub fn init_observability_with_config(config: &ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    // Initialize tracing first so metrics setup is logged
    init_tracing_with_config(config)?;
    init_metrics_with_config(config)?;

    tracing::info!(
        environment = %config.environment,
        metrics_port = %config.metrics_port,
        "Observability stack initialized successfully"
    );
    Ok(())
}

/// Initialize structured logging with tracing and configuration
fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("bottender={}", config.log_level).parse()?)
        .add_directive("sqlx=warn".parse()?)
        .add_directive("teloxide=warn".parse()?);

    // Pretty for development, JSON for everything else
    if config.is_development()
        || std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()) == "pretty"
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install the Prometheus recorder, serving `/metrics` when export is enabled
fn init_metrics_with_config(config: &ObservabilityConfig) -> Result<()> {
    if config.enable_metrics_export {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
        PrometheusBuilder::new().with_http_listener(addr).install()?;
        tracing::info!(%addr, "Prometheus metrics exporter listening");
    } else {
        PrometheusBuilder::new().install_recorder()?;
        tracing::info!("Metrics collection initialized without export");
    }
    Ok(())
}

/// Create a span for database operations
pub fn db_span(operation: &str, table: &str) -> tracing::Span {
    tracing::info_span!(
        "db_operation",
        operation = operation,
        table = table,
        component = "database"
    )
}

/// Create a span for chat operations
pub fn telegram_span(operation: &str, conversation: i64) -> tracing::Span {
    tracing::info_span!(
        "telegram_operation",
        operation = operation,
        conversation = conversation,
        component = "telegram"
    )
}

/// Record database operation metrics
pub fn record_db_metrics(operation: &str, duration: std::time::Duration) {
    let operation = operation.to_string();
    metrics::counter!("db_operations_total", "operation" => operation).increment(1);
    metrics::histogram!("db_operation_duration_seconds").record(duration.as_secs_f64());
}

/// Record an incoming chat message by kind
pub fn record_telegram_message(message_type: &str) {
    let message_type = message_type.to_string();
    metrics::counter!("telegram_messages_total", "type" => message_type).increment(1);
}

/// Record the outcome of one command
pub fn record_command_metrics(command: &str, result: &str, duration: std::time::Duration) {
    let command = command.to_string();
    let result = result.to_string();
    metrics::counter!("commands_total", "command" => command.clone(), "result" => result)
        .increment(1);
    metrics::histogram!("command_duration_seconds", "command" => command)
        .record(duration.as_secs_f64());
}

/// Record a failed send or broadcast
pub fn record_transport_failure(kind: &str) {
    let kind = kind.to_string();
    metrics::counter!("transport_failures_total", "kind" => kind).increment(1);
}
