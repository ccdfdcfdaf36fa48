//! Locale identifiers, recipient identities, and the locale preference store

use dashmap::DashMap;
use herald_common::RecipientId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use unic_langid::LanguageIdentifier;

/// An opaque locale identifier such as `"en"` or `"fr-FR"`.
///
/// Comparison is exact and case-sensitive. Cloning is cheap (shared string),
/// and a `Locale` can be looked up in maps by `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(Arc<str>);

impl Locale {
    /// Create a locale from any string-like value
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(Arc::from(code.as_ref()))
    }

    /// The locale code exactly as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag (`"pt"` for `"pt-BR"` or `"pt_BR"`)
    pub fn language(&self) -> &str {
        self.0
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
    }

    /// Parse into a BCP-47 language identifier, if the code is well-formed
    pub fn language_identifier(&self) -> Option<LanguageIdentifier> {
        self.0.replace('_', "-").parse().ok()
    }

    /// Whether the code is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self(Arc::from(code))
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0.to_string()
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Locale {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Anything that can be mapped to a locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipientIdentity {
    /// An explicit locale, used as-is
    Locale(Locale),
    /// A recipient whose locale is looked up in the preference store
    Recipient(RecipientId),
}

impl From<Locale> for RecipientIdentity {
    fn from(locale: Locale) -> Self {
        Self::Locale(locale)
    }
}

impl From<&Locale> for RecipientIdentity {
    fn from(locale: &Locale) -> Self {
        Self::Locale(locale.clone())
    }
}

impl From<&str> for RecipientIdentity {
    fn from(code: &str) -> Self {
        Self::Locale(Locale::new(code))
    }
}

impl From<RecipientId> for RecipientIdentity {
    fn from(id: RecipientId) -> Self {
        Self::Recipient(id)
    }
}

/// Recipient → locale preferences.
///
/// Populated when a session starts and updated on explicit language changes.
/// Safe to read from message-send call sites while another thread writes.
#[derive(Debug, Default)]
pub struct LocalePreferences {
    entries: DashMap<RecipientId, Locale>,
}

impl LocalePreferences {
    /// Create an empty preference store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recipient's preferred locale, returning the previous one
    pub fn set(&self, recipient: RecipientId, locale: impl Into<Locale>) -> Option<Locale> {
        let locale = locale.into();
        debug!("Recipient {} prefers locale {}", recipient, locale);
        self.entries.insert(recipient, locale)
    }

    /// Preferred locale for a recipient, if one was recorded
    pub fn get(&self, recipient: RecipientId) -> Option<Locale> {
        self.entries.get(&recipient).map(|entry| entry.value().clone())
    }

    /// Forget a recipient's preference (e.g. when the session ends)
    pub fn remove(&self, recipient: RecipientId) -> Option<Locale> {
        self.entries.remove(&recipient).map(|(_, locale)| locale)
    }

    /// Whether a preference exists for the recipient
    pub fn contains(&self, recipient: RecipientId) -> bool {
        self.entries.contains_key(&recipient)
    }

    /// Number of recorded preferences
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no preferences are recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every recorded preference
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<L: Into<Locale>> FromIterator<(RecipientId, L)> for LocalePreferences {
    fn from_iter<I: IntoIterator<Item = (RecipientId, L)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(id, locale)| (id, locale.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_locale_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Locale::new("en"), 1);
        assert_eq!(map.get("en"), Some(&1));
        assert_eq!(map.get("fr"), None);
    }

    #[test]
    fn test_locale_language_subtag() {
        assert_eq!(Locale::new("pt-BR").language(), "pt");
        assert_eq!(Locale::new("zh_Hans").language(), "zh");
        assert_eq!(Locale::new("en").language(), "en");
    }

    #[test]
    fn test_locale_language_identifier() {
        let id = Locale::new("en_US").language_identifier().unwrap();
        assert_eq!(id.to_string(), "en-US");
        assert!(Locale::new("not a locale!").language_identifier().is_none());
    }

    #[test]
    fn test_locale_serde_is_plain_string() {
        let json = serde_json::to_string(&Locale::new("de")).unwrap();
        assert_eq!(json, "\"de\"");
        let back: Locale = serde_json::from_str("\"ru\"").unwrap();
        assert_eq!(back, "ru");
    }

    #[test]
    fn test_preferences_set_get_remove() {
        let prefs = LocalePreferences::new();
        assert!(prefs.is_empty());

        assert_eq!(prefs.set(RecipientId(1), "fr"), None);
        assert_eq!(prefs.set(RecipientId(1), "de"), Some(Locale::new("fr")));
        assert_eq!(prefs.get(RecipientId(1)), Some(Locale::new("de")));
        assert!(prefs.contains(RecipientId(1)));

        assert_eq!(prefs.remove(RecipientId(1)), Some(Locale::new("de")));
        assert_eq!(prefs.get(RecipientId(1)), None);
    }

    #[test]
    fn test_preferences_from_iter() {
        let prefs: LocalePreferences = [(RecipientId(1), "en"), (RecipientId(2), "es")]
            .into_iter()
            .collect();
        assert_eq!(prefs.len(), 2);
        assert_eq!(prefs.get(RecipientId(2)), Some(Locale::new("es")));
    }

    #[test]
    fn test_identity_conversions() {
        assert_eq!(
            RecipientIdentity::from("en"),
            RecipientIdentity::Locale(Locale::new("en"))
        );
        assert_eq!(
            RecipientIdentity::from(RecipientId(9)),
            RecipientIdentity::Recipient(RecipientId(9))
        );
    }
}
