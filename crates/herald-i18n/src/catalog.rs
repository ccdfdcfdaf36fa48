//! Translation catalog: (key, locale) → template record
//!
//! # Invariants
//!
//! 1. **Immutable after build**: a [`TranslationCatalog`] is never mutated;
//!    reloading builds a new catalog and swaps it into a [`CatalogHandle`].
//!
//! 2. **Pure lookup**: [`TranslationCatalog::resolve_template`] does no
//!    fallback. The chain lives in [`crate::resolver`].
//!
//! 3. **Validation never fails the build**: problems are logged and the
//!    offending records are flagged [`TemplateFlags::invalid`].

use crate::color::{extract_color, Color};
use crate::defaults::{BUILTIN_ENGLISH, BUILTIN_LOCALE};
use crate::error::{I18nError, I18nResult};
use crate::format::{placeholder_arity, FormatError};
use crate::locale::Locale;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-record flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFlags {
    /// Keep color markup in the text; no color is extracted
    pub keep_markup: bool,
    /// Set by load-time validation when the record breaks a contract
    pub invalid: bool,
}

/// Authoring input for one (key, locale) template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    /// Template text, possibly wrapped in color markup
    pub template: String,
    /// Declared argument count
    #[serde(default)]
    pub args: Option<usize>,
    /// Per-argument numeric format hints
    #[serde(default)]
    pub formats: Vec<Option<String>>,
    /// Do not extract color from markup
    #[serde(default)]
    pub keep_markup: bool,
}

impl TemplateSpec {
    /// A spec with only template text
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    /// Declare the argument count
    pub fn with_args(mut self, args: usize) -> Self {
        self.args = Some(args);
        self
    }

    /// Set per-argument format hints
    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(|f| f.map(Into::into)).collect();
        self
    }

    /// Keep markup in the text instead of extracting color
    pub fn keep_markup(mut self) -> Self {
        self.keep_markup = true;
        self
    }
}

impl From<&str> for TemplateSpec {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for TemplateSpec {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

/// A loaded template for one (key, locale)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    original: String,
    text: String,
    color: Option<Color>,
    arity: usize,
    declared_args: Option<usize>,
    arg_formats: Vec<Option<String>>,
    flags: TemplateFlags,
    problem: Option<FormatError>,
}

impl TemplateRecord {
    /// Build a record, extracting color and counting placeholders
    pub fn new(spec: TemplateSpec) -> Self {
        let (color, text) = if spec.keep_markup {
            (None, spec.template.clone())
        } else {
            match extract_color(&spec.template) {
                Some((color, inner)) => (Some(color), inner.to_string()),
                None => (None, spec.template.clone()),
            }
        };
        let (arity, problem) = match placeholder_arity(&text) {
            Ok(arity) => (arity, None),
            Err(error) => (0, Some(error)),
        };

        Self {
            original: spec.template,
            text,
            color,
            arity,
            declared_args: spec.args,
            arg_formats: spec.formats,
            flags: TemplateFlags {
                keep_markup: spec.keep_markup,
                invalid: false,
            },
            problem,
        }
    }

    /// Template exactly as authored
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Template with wrapping color markup removed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Color extracted from markup, if any
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Number of arguments the template consumes
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Declared argument count, if the author gave one
    pub fn declared_args(&self) -> Option<usize> {
        self.declared_args
    }

    /// Per-argument format hints
    pub fn arg_formats(&self) -> &[Option<String>] {
        &self.arg_formats
    }

    /// Record flags
    pub fn flags(&self) -> TemplateFlags {
        self.flags
    }

    /// Whether validation flagged this record
    pub fn is_invalid(&self) -> bool {
        self.flags.invalid
    }

    /// Parse problem found while counting placeholders
    pub fn problem(&self) -> Option<&FormatError> {
        self.problem.as_ref()
    }
}

/// Immutable (key, locale) → [`TemplateRecord`] mapping
#[derive(Debug, Clone)]
pub struct TranslationCatalog {
    default_locale: Locale,
    locales: Vec<Locale>,
    tables: HashMap<Locale, HashMap<String, TemplateRecord>>,
    invalid: Vec<(Locale, String)>,
}

impl TranslationCatalog {
    /// Start building a catalog
    pub fn builder(default_locale: impl Into<Locale>) -> CatalogBuilder {
        CatalogBuilder::new(default_locale)
    }

    /// A catalog with no entries at all
    pub fn empty(default_locale: impl Into<Locale>) -> Self {
        CatalogBuilder::new(default_locale).build()
    }

    /// Build a catalog from a definition table
    pub fn from_definition(definition: &CatalogDefinition, strict: bool) -> I18nResult<Self> {
        let default_locale = definition
            .default_locale
            .clone()
            .ok_or(I18nError::MissingDefaultLocale)?;
        let mut builder = CatalogBuilder::new(default_locale).strict(strict);
        builder.extend_from_definition(definition)?;
        Ok(builder.build())
    }

    /// Template for exactly (key, locale), without fallback
    pub fn resolve_template(&self, key: &str, locale: &str) -> Option<&TemplateRecord> {
        self.tables.get(locale)?.get(key)
    }

    /// Like [`Self::resolve_template`], also returning the catalog's own locale
    pub fn resolve_entry(&self, key: &str, locale: &str) -> Option<(&Locale, &TemplateRecord)> {
        let (locale, table) = self.tables.get_key_value(locale)?;
        Some((locale, table.get(key)?))
    }

    /// Whether (key, locale) has an entry
    pub fn contains(&self, key: &str, locale: &str) -> bool {
        self.resolve_template(key, locale).is_some()
    }

    /// The designated default locale
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Locales with at least one entry, in first-insertion order
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// First locale that received an entry
    pub fn first_locale(&self) -> Option<&Locale> {
        self.locales.first()
    }

    /// Whether the locale has any entries
    pub fn has_locale(&self, locale: &str) -> bool {
        self.tables.contains_key(locale)
    }

    /// Keys defined for a locale
    pub fn keys<'a>(&'a self, locale: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.tables
            .get(locale)
            .into_iter()
            .flat_map(|table| table.keys().map(String::as_str))
    }

    /// Total number of (key, locale) entries
    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(HashMap::is_empty)
    }

    /// (locale, key) pairs flagged by validation, sorted
    pub fn invalid_entries(&self) -> &[(Locale, String)] {
        &self.invalid
    }
}

/// Builder for [`TranslationCatalog`]
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    default_locale: Locale,
    strict: bool,
    locales: Vec<Locale>,
    tables: HashMap<Locale, HashMap<String, TemplateSpec>>,
}

impl CatalogBuilder {
    /// Create a builder for the given default locale
    pub fn new(default_locale: impl Into<Locale>) -> Self {
        Self {
            default_locale: default_locale.into(),
            strict: false,
            locales: Vec::new(),
            tables: HashMap::new(),
        }
    }

    /// Enable cross-locale consistency checks
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Add an entry (chaining form)
    pub fn entry(
        mut self,
        locale: impl Into<Locale>,
        key: impl Into<String>,
        spec: impl Into<TemplateSpec>,
    ) -> Self {
        self.insert(locale, key, spec);
        self
    }

    /// Add an entry, returning the template it replaced
    pub fn insert(
        &mut self,
        locale: impl Into<Locale>,
        key: impl Into<String>,
        spec: impl Into<TemplateSpec>,
    ) -> Option<TemplateSpec> {
        let locale = locale.into();
        let key = key.into();
        if !self.tables.contains_key(locale.as_str()) {
            self.locales.push(locale.clone());
        }
        let previous = self
            .tables
            .entry(locale.clone())
            .or_default()
            .insert(key.clone(), spec.into());
        if previous.is_some() {
            warn!("Duplicate translation '{}' for locale {}, keeping the last one", key, locale);
        }
        previous
    }

    /// Add the built-in English templates for keys not already present
    pub fn with_builtin_defaults(mut self) -> Self {
        let locale = Locale::new(BUILTIN_LOCALE);
        for builtin in BUILTIN_ENGLISH {
            let exists = self
                .tables
                .get(BUILTIN_LOCALE)
                .is_some_and(|table| table.contains_key(builtin.key));
            if exists {
                continue;
            }
            let mut spec = TemplateSpec::new(builtin.template);
            spec.args = builtin.args;
            self.insert(locale.clone(), builtin.key, spec);
        }
        self
    }

    /// Add every entry of a definition table
    pub fn extend_from_definition(&mut self, definition: &CatalogDefinition) -> I18nResult<()> {
        for (index, entry) in definition.entries.iter().enumerate() {
            if entry.key.is_empty() {
                return Err(I18nError::EmptyKey { index });
            }
            if entry.templates.is_empty() {
                warn!("Translation '{}' has no templates, skipping", entry.key);
                continue;
            }
            for (locale, template) in &entry.templates {
                if locale.is_empty() || locale.language_identifier().is_none() {
                    return Err(I18nError::InvalidLocale(locale.as_str().to_string()));
                }
                let spec = TemplateSpec {
                    template: template.clone(),
                    args: entry.args,
                    formats: entry.formats.clone(),
                    keep_markup: entry.keep_markup,
                };
                self.insert(locale.clone(), entry.key.clone(), spec);
            }
        }
        Ok(())
    }

    /// Validate and freeze the catalog
    pub fn build(self) -> TranslationCatalog {
        let Self {
            default_locale,
            strict,
            locales,
            tables,
        } = self;

        let mut tables: HashMap<Locale, HashMap<String, TemplateRecord>> = tables
            .into_iter()
            .map(|(locale, table)| {
                let records = table
                    .into_iter()
                    .map(|(key, spec)| (key, TemplateRecord::new(spec)))
                    .collect();
                (locale, records)
            })
            .collect();

        let invalid = validate(&default_locale, &locales, &mut tables, strict);

        let catalog = TranslationCatalog {
            default_locale,
            locales,
            tables,
            invalid,
        };

        if !catalog.has_locale(catalog.default_locale.as_str()) {
            warn!(
                "Default locale {} has no translations; lookups will fall back to {:?}",
                catalog.default_locale,
                catalog.first_locale().map(Locale::as_str)
            );
        }
        info!(
            "Built translation catalog: {} locale(s), {} entries, {} flagged",
            catalog.locales.len(),
            catalog.len(),
            catalog.invalid.len()
        );
        catalog
    }
}

fn validate(
    default_locale: &Locale,
    locales: &[Locale],
    tables: &mut HashMap<Locale, HashMap<String, TemplateRecord>>,
    strict: bool,
) -> Vec<(Locale, String)> {
    let default_arity: HashMap<String, usize> = tables
        .get(default_locale.as_str())
        .map(|table| {
            table
                .iter()
                .map(|(key, record)| (key.clone(), record.arity))
                .collect()
        })
        .unwrap_or_default();

    let mut invalid = Vec::new();
    for locale in locales {
        let Some(table) = tables.get_mut(locale.as_str()) else {
            continue;
        };
        let mut keys: Vec<&String> = table.keys().collect();
        keys.sort();
        let keys: Vec<String> = keys.into_iter().cloned().collect();

        for key in keys {
            let Some(record) = table.get_mut(&key) else {
                continue;
            };
            let mut flagged = false;

            if let Some(problem) = &record.problem {
                warn!("Translation '{}' ({}) is malformed: {}", key, locale, problem);
                flagged = true;
            }

            if let Some(declared) = record.declared_args {
                if record.arity > declared {
                    warn!(
                        "Translation '{}' ({}) uses {} argument(s) but declares {}",
                        key, locale, record.arity, declared
                    );
                    flagged = true;
                } else if record.arity < declared {
                    debug!(
                        "Translation '{}' ({}) ignores {} of {} declared argument(s)",
                        key,
                        locale,
                        declared - record.arity,
                        declared
                    );
                }
            }

            if locale != default_locale {
                if let Some(&expected) = default_arity.get(&key) {
                    if record.arity > expected {
                        if strict {
                            warn!(
                                "Translation '{}' ({}) uses {} argument(s), \
                                 default locale {} uses {}",
                                key, locale, record.arity, default_locale, expected
                            );
                            flagged = true;
                        } else {
                            debug!(
                                "Translation '{}' ({}) uses more arguments than default locale {}",
                                key, locale, default_locale
                            );
                        }
                    }
                } else if strict {
                    debug!(
                        "Translation '{}' exists in {} but not in default locale {}",
                        key, locale, default_locale
                    );
                }
            }

            if flagged {
                record.flags.invalid = true;
                invalid.push((locale.clone(), key));
            }
        }
    }
    invalid
}

/// Swappable catalog snapshot with lock-free reads
#[derive(Debug)]
pub struct CatalogHandle {
    catalog: ArcSwap<TranslationCatalog>,
}

impl CatalogHandle {
    /// Wrap an initial catalog
    pub fn new(catalog: TranslationCatalog) -> Self {
        Self {
            catalog: ArcSwap::from_pointee(catalog),
        }
    }

    /// Current snapshot
    pub fn get(&self) -> Arc<TranslationCatalog> {
        self.catalog.load_full()
    }

    /// Replace the whole catalog atomically, returning the previous one
    pub fn update(&self, catalog: TranslationCatalog) -> Arc<TranslationCatalog> {
        info!(
            "Swapping translation catalog ({} entries, default locale {})",
            catalog.len(),
            catalog.default_locale()
        );
        self.catalog.swap(Arc::new(catalog))
    }
}

/// Declarative definition table (serde)
///
/// ```toml
/// default_locale = "en"
///
/// [[entries]]
/// key = "greeting"
/// args = 1
/// [entries.templates]
/// en = "<color=#ffcc00>Hello {0}</color>"
/// fr = "Bonjour {0}"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    /// Default locale; required unless the caller supplies one
    #[serde(default)]
    pub default_locale: Option<Locale>,
    /// Translation entries
    #[serde(default)]
    pub entries: Vec<DefinitionEntry>,
}

/// One key with its per-locale templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionEntry {
    /// Translation key
    pub key: String,
    /// Declared argument count
    #[serde(default)]
    pub args: Option<usize>,
    /// Per-argument numeric format hints
    #[serde(default)]
    pub formats: Vec<Option<String>>,
    /// Do not extract color from markup
    #[serde(default)]
    pub keep_markup: bool,
    /// Locale → template
    #[serde(default)]
    pub templates: BTreeMap<Locale, String>,
}
