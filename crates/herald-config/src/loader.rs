//! Configuration loading utilities

use crate::defaults::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
use crate::schema::Config;
use herald_common::{HeraldError, Result as HeraldResult};
use herald_i18n::I18nError;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading a configuration or definition file
    #[error("Failed to read {path}: {source}")]
    IoError {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Definition file with an extension we cannot parse
    #[error("Unsupported definition file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Definition table rejected while building the catalog
    #[error("Invalid translation definitions in {path}: {source}")]
    CatalogError {
        /// File the definitions came from
        path: PathBuf,
        /// Catalog error
        #[source]
        source: I18nError,
    },
}

impl ConfigError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<ConfigError> for HeraldError {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        match &err {
            ConfigError::ValidationError(errors) => {
                let field = errors
                    .errors()
                    .keys()
                    .min()
                    .map_or_else(String::new, |field| field.to_string());
                Self::validation_field(message, field)
            }
            _ => Self::config_with_source(message, err),
        }
    }
}

/// Configuration loader for Herald
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file with environment variable overrides.
    ///
    /// Relative `catalog_paths` are resolved against the file's directory.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let mut config: Config = toml::from_str(&content)?;

        if let Some(base) = path.parent() {
            config.localization.resolve_paths(base);
        }

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from `HERALD_CONFIG_PATH`, `./herald.toml`, or defaults
    pub fn load() -> HeraldResult<Config> {
        let explicit = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Ok(Self::discover(explicit.as_deref(), Path::new("."))?)
    }

    /// Load from `explicit` if given, else `dir/herald.toml` if present, else defaults
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_config(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.exists() {
            return Self::load_config(candidate);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HERALD_*` environment variable overrides
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |name| env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let localization = &mut config.localization;

        if let Some(locale) = lookup("HERALD_DEFAULT_LOCALE") {
            localization.default_locale = locale;
        }

        if let Some(color) = lookup("HERALD_DEFAULT_COLOR") {
            localization.default_color = color;
        }

        if let Some(strict) = lookup("HERALD_STRICT_VALIDATION") {
            localization.strict_validation = parse_var("HERALD_STRICT_VALIDATION", &strict)?;
        }

        if let Some(paths) = lookup("HERALD_CATALOG_PATHS") {
            localization.catalog_paths = paths
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        if let Some(preload) = lookup("HERALD_PRELOAD_BUILTIN") {
            localization.preload_builtin = parse_var("HERALD_PRELOAD_BUILTIN", &preload)?;
        }

        let logging = &mut config.logging;

        if let Some(level) = lookup("HERALD_LOG_LEVEL") {
            logging.level = level;
        }

        if let Some(json) = lookup("HERALD_LOG_JSON") {
            logging.json_format = parse_var("HERALD_LOG_JSON", &json)?;
        }

        if let Some(file) = lookup("HERALD_LOG_FILE") {
            logging.file = Some(file);
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn create_test_config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_load_valid_config() {
        let file = create_test_config_file(
            "[localization]\n\
             default_locale = \"de\"\n\
             default_color = \"#ffcc00\"\n\
             strict_validation = true\n\
             catalog_paths = [\"lang/base.toml\"]\n\
             \n\
             [logging]\n\
             level = \"debug\"\n",
        );
        let config = ConfigLoader::load_config(file.path()).expect("Failed to load config");

        assert_eq!(config.localization.default_locale, "de");
        assert!(config.localization.strict_validation);
        assert!(config.localization.preload_builtin);
        assert_eq!(config.logging.level, "debug");

        let expected = file.path().parent().unwrap().join("lang/base.toml");
        assert_eq!(config.localization.catalog_paths, vec![expected]);
    }

    #[test]
    fn test_invalid_toml() {
        let file = create_test_config_file("[localization\ndefault_locale = ");
        let result = ConfigLoader::load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::TomlError(_)));
    }

    #[test]
    fn test_validation_error() {
        let file = create_test_config_file("[localization]\ndefault_color = \"orange\"\n");
        let result = ConfigLoader::load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConfigLoader::load_config("/nonexistent/path/herald.toml");
        match result.unwrap_err() {
            ConfigError::IoError { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/path/herald.toml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        ConfigLoader::apply_overrides(
            &mut config,
            vars(&[
                ("HERALD_DEFAULT_LOCALE", "ru"),
                ("HERALD_STRICT_VALIDATION", "true"),
                ("HERALD_CATALOG_PATHS", "a.toml, b.yaml,,"),
                ("HERALD_LOG_JSON", "true"),
                ("HERALD_LOG_FILE", "/tmp/herald.log"),
            ]),
        )
        .unwrap();

        assert_eq!(config.localization.default_locale, "ru");
        assert!(config.localization.strict_validation);
        assert_eq!(
            config.localization.catalog_paths,
            vec![PathBuf::from("a.toml"), PathBuf::from("b.yaml")]
        );
        assert!(config.logging.json_format);
        assert_eq!(config.logging.file.as_deref(), Some("/tmp/herald.log"));
    }

    #[test]
    fn test_override_parse_error() {
        let mut config = Config::default();
        let err = ConfigLoader::apply_overrides(
            &mut config,
            vars(&[("HERALD_PRELOAD_BUILTIN", "sometimes")]),
        )
        .unwrap_err();
        match err {
            ConfigError::EnvParseError { var, .. } => assert_eq!(var, "HERALD_PRELOAD_BUILTIN"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::discover(None, dir.path()).unwrap();
        assert_eq!(config.localization.default_locale, "en");

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[localization]\ndefault_locale = \"es\"\n",
        )
        .unwrap();
        let config = ConfigLoader::discover(None, dir.path()).unwrap();
        assert_eq!(config.localization.default_locale, "es");

        let explicit = create_test_config_file("[localization]\ndefault_locale = \"pl\"\n");
        let config = ConfigLoader::discover(Some(explicit.path()), dir.path()).unwrap();
        assert_eq!(config.localization.default_locale, "pl");
    }

    #[test]
    fn test_conversion_to_herald_error() {
        let err: HeraldError = ConfigError::UnsupportedFormat(PathBuf::from("x.ini")).into();
        assert!(matches!(err, HeraldError::Config { .. }));
        assert!(err.to_string().contains("x.ini"));
    }

    #[test]
    fn test_validation_failure_names_field() {
        let file = create_test_config_file("[logging]\nlevel = \"loud\"\n");
        let err: HeraldError = ConfigLoader::load_config(file.path()).unwrap_err().into();
        match err {
            HeraldError::Validation { message, field } => {
                assert!(message.contains("validation failed"));
                assert_eq!(field.as_deref(), Some("logging"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
