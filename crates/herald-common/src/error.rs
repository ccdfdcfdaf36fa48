//! Error types and utilities for Herald

use thiserror::Error;

/// Result type alias for Herald operations
pub type Result<T> = std::result::Result<T, HeraldError>;

/// Main error type for Herald operations
#[derive(Error, Debug)]
pub enum HeraldError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internationalization and localization errors
    #[error("Localization error: {message}")]
    Localization {
        /// What went wrong
        message: String,
        /// Locale involved, if any
        locale: Option<String>,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for settings or definition data
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
        /// Offending field
        field: Option<String>,
    },
}

impl HeraldError {
    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error with locale
    pub fn localization_with_locale(msg: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: Some(locale.into()),
            source: None,
        }
    }

    /// Create a new localization error wrapping the underlying cause
    pub fn localization_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}
