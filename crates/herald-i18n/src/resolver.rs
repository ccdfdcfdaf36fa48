//! Locale resolution and the template fallback chain
//!
//! The chain for a key is: requested locale → default locale → first locale
//! present in the catalog → raw key. Each locale is tried at most once.

use crate::catalog::{TemplateRecord, TranslationCatalog};
use crate::format::{raw_key_text, Arg, Formatter, Rendered, Variant};
use crate::locale::{Locale, LocalePreferences, RecipientIdentity};
use tracing::{debug, warn};

/// Result of walking the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A template was found
    Found {
        /// The template
        record: &'a TemplateRecord,
        /// Locale that actually supplied it
        locale: &'a Locale,
    },
    /// Nothing matched; render the key itself
    RawKey,
}

impl<'a> Resolution<'a> {
    /// The record, if one was found
    pub fn record(&self) -> Option<&'a TemplateRecord> {
        match self {
            Self::Found { record, .. } => Some(record),
            Self::RawKey => None,
        }
    }

    /// The locale used, if a record was found
    pub fn used_locale(&self) -> Option<&'a Locale> {
        match self {
            Self::Found { locale, .. } => Some(locale),
            Self::RawKey => None,
        }
    }

    /// Format the found record, or the raw key when nothing matched
    pub fn render(&self, key: &str, args: &[Arg], variant: Variant) -> Rendered {
        match self {
            Self::Found { record, .. } => Formatter::render(key, record, args, variant),
            Self::RawKey => Rendered::Formatted(raw_key_text(key, args)),
        }
    }
}

/// Borrowing view over one catalog snapshot and the preference store
#[derive(Debug, Clone, Copy)]
pub struct LocaleResolver<'a> {
    catalog: &'a TranslationCatalog,
    preferences: &'a LocalePreferences,
}

impl<'a> LocaleResolver<'a> {
    /// Create a resolver for a catalog snapshot
    pub fn new(catalog: &'a TranslationCatalog, preferences: &'a LocalePreferences) -> Self {
        Self {
            catalog,
            preferences,
        }
    }

    /// The catalog being resolved against
    pub fn catalog(&self) -> &'a TranslationCatalog {
        self.catalog
    }

    /// The catalog's default locale
    pub fn default_locale(&self) -> &'a Locale {
        self.catalog.default_locale()
    }

    /// Locale to render in for a recipient identity.
    ///
    /// Explicit locales are returned unchanged, even when the catalog has no
    /// entries for them.
    pub fn effective_locale(&self, identity: &RecipientIdentity) -> Locale {
        match identity {
            RecipientIdentity::Locale(locale) => locale.clone(),
            RecipientIdentity::Recipient(id) => self
                .preferences
                .get(*id)
                .unwrap_or_else(|| self.default_locale().clone()),
        }
    }

    /// Walk the fallback chain for `key`, starting at `locale`
    pub fn resolve_with_fallback(&self, key: &str, locale: &str) -> Resolution<'a> {
        let catalog = self.catalog;
        let default = catalog.default_locale();

        if let Some(found) = self.try_locale(key, locale) {
            return found;
        }

        if default != &locale {
            if let Some(found) = self.try_locale(key, default.as_str()) {
                debug!(
                    "Translation '{}' missing for {}, using default locale {}",
                    key, locale, default
                );
                return found;
            }
        }

        if let Some(first) = catalog.first_locale() {
            if first != &locale && first != default {
                if let Some(found) = self.try_locale(key, first.as_str()) {
                    debug!(
                        "Translation '{}' missing for {} and {}, using first locale {}",
                        key, locale, default, first
                    );
                    return found;
                }
            }
        }

        warn!(
            "Translation '{}' not found in any locale (requested {}), rendering raw key",
            key, locale
        );
        Resolution::RawKey
    }

    /// Resolve for an identity in one step
    pub fn resolve_for(&self, key: &str, identity: &RecipientIdentity) -> Resolution<'a> {
        let locale = self.effective_locale(identity);
        self.resolve_with_fallback(key, locale.as_str())
    }

    fn try_locale(&self, key: &str, locale: &str) -> Option<Resolution<'a>> {
        let (locale, record) = self.catalog.resolve_entry(key, locale)?;
        Some(Resolution::Found { record, locale })
    }
}
