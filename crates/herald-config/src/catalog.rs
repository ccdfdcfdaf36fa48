//! Loading translation definition tables into a catalog

use crate::loader::ConfigError;
use crate::schema::Config;
use anyhow::Context;
use herald_i18n::{
    CatalogBuilder, CatalogDefinition, LocalePreferences, TranslationCatalog, Translator,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Serialization format of a definition file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl DefinitionFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Parse a definition table in this format
    pub fn parse(self, content: &str) -> Result<CatalogDefinition, ConfigError> {
        Ok(match self {
            Self::Toml => toml::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        })
    }
}

/// Read one definition table, choosing the parser by extension
pub fn load_definition<P: AsRef<Path>>(path: P) -> Result<CatalogDefinition, ConfigError> {
    let path = path.as_ref();
    let format = DefinitionFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let definition = format.parse(&content)?;

    debug!(
        "Read {} translation entries from {}",
        definition.entries.len(),
        path.display()
    );
    Ok(definition)
}

/// Build a catalog from every configured definition table.
///
/// Tables are applied in order, so later files override earlier ones. The
/// built-in English table only fills keys no file defined.
pub fn build_catalog(config: &Config) -> Result<TranslationCatalog, ConfigError> {
    let localization = &config.localization;
    let mut builder = CatalogBuilder::new(localization.default_locale.as_str())
        .strict(localization.strict_validation);

    for path in &localization.catalog_paths {
        let definition = load_definition(path)?;
        if let Some(declared) = &definition.default_locale {
            if declared != localization.default_locale.as_str() {
                warn!(
                    "{} declares default locale {}, using configured {}",
                    path.display(),
                    declared,
                    localization.default_locale
                );
            }
        }
        builder
            .extend_from_definition(&definition)
            .map_err(|source| ConfigError::CatalogError {
                path: path.clone(),
                source,
            })?;
    }

    if localization.preload_builtin {
        builder = builder.with_builtin_defaults();
    }

    let catalog = builder.build();
    info!(
        "Loaded {} definition file(s) for default locale {}",
        localization.catalog_paths.len(),
        catalog.default_locale()
    );
    Ok(catalog)
}

/// Build the translation facade for a configuration
pub fn build_translator(
    config: &Config,
    preferences: Arc<LocalePreferences>,
) -> anyhow::Result<Translator> {
    let catalog = build_catalog(config).with_context(|| {
        format!(
            "Failed to build translation catalog for default locale {}",
            config.localization.default_locale
        )
    })?;
    Ok(Translator::new(catalog, preferences).with_default_color(config.localization.color()))
}
