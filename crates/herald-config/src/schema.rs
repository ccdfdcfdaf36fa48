//! Configuration schema with validation attributes.

use herald_common::LoggingConfig;
use herald_i18n::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Main configuration structure for Herald.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Localization settings.
    #[validate(nested)]
    pub localization: LocalizationConfig,
    /// Logging settings.
    #[validate(nested)]
    pub logging: LoggingSettings,
}

/// Localization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Terminal fallback locale.
    #[validate(custom(
        function = "crate::validation::validate_locale",
        message = "Default locale must be a language identifier such as \"en\" or \"pt-BR\""
    ))]
    pub default_locale: String,

    /// Color for templates without color markup, as `#RRGGBB`.
    #[validate(custom(
        function = "crate::validation::validate_color",
        message = "Default color must be a #RRGGBB hex color"
    ))]
    pub default_color: String,

    /// Flag cross-locale argument mismatches as invalid.
    pub strict_validation: bool,

    /// Definition tables to load, in order; later tables override earlier ones.
    pub catalog_paths: Vec<PathBuf>,

    /// Register the built-in English templates under "en".
    pub preload_builtin: bool,
}

impl LocalizationConfig {
    /// The default color, or white if the string does not parse.
    pub fn color(&self) -> Color {
        Color::from_hex(&self.default_color).unwrap_or(Color::WHITE)
    }

    /// Resolve relative catalog paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in &mut self.catalog_paths {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log filter (trace, debug, info, warn, error, or target=level directives).
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Emit JSON lines.
    pub json_format: bool,

    /// Human-readable multi-line output.
    pub pretty_format: bool,

    /// Optional log file path.
    pub file: Option<String>,

    /// Log span open/close events.
    pub include_spans: bool,

    /// Include the event target.
    pub include_targets: bool,
}

impl LoggingSettings {
    /// Convert into the subscriber configuration.
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            json_format: self.json_format,
            pretty_format: self.pretty_format,
            file_path: self.file.clone(),
            include_spans: self.include_spans,
            include_targets: self.include_targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[localization]\ndefault_locale = \"fr\"\n").unwrap();
        assert_eq!(config.localization.default_locale, "fr");
        assert_eq!(config.localization.default_color, "#ffffff");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_localization_validation() {
        let mut config = Config::default();
        config.localization.default_locale = "???".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.localization.default_color = "red".to_string();
        let errors = config.validate().unwrap_err();
        assert!(errors.errors().contains_key("localization"));
    }

    #[test]
    fn test_logging_validation() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_color_and_logging_conversion() {
        let mut config = Config::default();
        config.localization.default_color = "#336699".to_string();
        config.logging.file = Some("herald.log".to_string());

        assert_eq!(config.localization.color(), Color::rgb(0x33, 0x66, 0x99));
        let logging = config.logging.to_logging_config();
        assert_eq!(logging.file_path.as_deref(), Some("herald.log"));
        assert_eq!(logging.level, "info");
    }

    #[test]
    fn test_resolve_paths() {
        let mut localization = LocalizationConfig {
            catalog_paths: vec![PathBuf::from("lang/en.toml"), PathBuf::from("/abs/fr.yaml")],
            ..LocalizationConfig::default()
        };
        localization.resolve_paths(Path::new("/etc/herald"));
        assert_eq!(
            localization.catalog_paths,
            vec![PathBuf::from("/etc/herald/lang/en.toml"), PathBuf::from("/abs/fr.yaml")]
        );
    }
}
