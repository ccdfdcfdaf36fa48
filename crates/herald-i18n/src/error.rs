//! Error types for internationalization operations
//!
//! Only catalog construction can fail. Message delivery never returns these.

use herald_common::HeraldError;
use thiserror::Error;

/// Errors that can occur while building a catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A definition table did not name a default locale and none was supplied
    #[error("Catalog definition has no default locale")]
    MissingDefaultLocale,

    /// A locale code is empty or cannot be used as an identifier
    #[error("Invalid locale identifier: {0:?}")]
    InvalidLocale(String),

    /// A definition entry has an empty key
    #[error("Definition entry #{index} has an empty key")]
    EmptyKey {
        /// Position of the entry in the table
        index: usize,
    },
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;

impl From<I18nError> for HeraldError {
    fn from(err: I18nError) -> Self {
        match &err {
            I18nError::InvalidLocale(locale) => {
                Self::localization_with_locale(err.to_string(), locale.clone())
            }
            _ => Self::localization_with_source("Failed to build translation catalog", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_keeps_locale() {
        let err: HeraldError = I18nError::InvalidLocale(String::new()).into();
        match err {
            HeraldError::Localization { locale, .. } => assert_eq!(locale.as_deref(), Some("")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            I18nError::EmptyKey { index: 3 }.to_string(),
            "Definition entry #3 has an empty key"
        );
    }
}
