//! Default configuration values.

use crate::schema::{Config, LocalizationConfig, LoggingSettings};

/// Locale used when none is configured
pub const DEFAULT_LOCALE: &str = "en";

/// Color for templates without color markup
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Config file looked for in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "herald.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "HERALD_CONFIG_PATH";

/// Default log filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

impl Default for Config {
    fn default() -> Self {
        Self {
            localization: LocalizationConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            default_color: DEFAULT_COLOR.to_string(),
            strict_validation: false,
            catalog_paths: Vec::new(),
            preload_builtin: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            pretty_format: true,
            file: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.localization.default_locale, "en");
        assert!(config.localization.preload_builtin);
        assert!(config.localization.catalog_paths.is_empty());
    }
}
