//! Structured logging infrastructure for Herald

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "herald_i18n=trace")
    pub level: String,
    /// Whether to emit JSON lines instead of human-readable output
    pub json_format: bool,
    /// Whether to enable pretty formatting with colors
    pub pretty_format: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: true,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Fails when a global subscriber is already installed or the log file
/// cannot be opened.
pub fn init_logging(config: LoggingConfig) -> crate::Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| crate::HeraldError::config_with_source("Invalid log filter", e))?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let writer = match &config.file_path {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };

    let result = if config.json_format {
        let layer = fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_target(config.include_targets);
        match writer {
            Some(file) => registry.with(layer.with_writer(Mutex::new(file))).try_init(),
            None => registry.with(layer).try_init(),
        }
    } else if config.pretty_format {
        let layer = fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_target(config.include_targets);
        match writer {
            Some(file) => registry
                .with(layer.with_ansi(false).with_writer(Mutex::new(file)))
                .try_init(),
            None => registry.with(layer).try_init(),
        }
    } else {
        let layer = fmt::layer()
            .compact()
            .with_span_events(span_events)
            .with_target(config.include_targets);
        match writer {
            Some(file) => registry
                .with(layer.with_ansi(false).with_writer(Mutex::new(file)))
                .try_init(),
            None => registry.with(layer).try_init(),
        }
    };

    result.map_err(|e| crate::HeraldError::config_with_source("Logging already initialized", e))?;
    tracing::debug!(
        level = %config.level,
        json = config.json_format,
        file = ?config.file_path,
        "Logging initialized"
    );
    Ok(())
}

/// Initialize logging with default configuration
pub fn init_default_logging() -> crate::Result<()> {
    init_logging(LoggingConfig::default())
}

/// Initialize logging for development (pretty, debug level)
pub fn init_dev_logging() -> crate::Result<()> {
    init_logging(LoggingConfig {
        level: "debug".to_string(),
        pretty_format: true,
        json_format: false,
        include_spans: true,
        ..LoggingConfig::default()
    })
}

/// Initialize logging for production (JSON lines, info level, file output)
pub fn init_prod_logging(log_file: impl Into<String>) -> crate::Result<()> {
    init_logging(LoggingConfig {
        level: "info".to_string(),
        json_format: true,
        pretty_format: false,
        file_path: Some(log_file.into()),
        include_spans: false,
        ..LoggingConfig::default()
    })
}
