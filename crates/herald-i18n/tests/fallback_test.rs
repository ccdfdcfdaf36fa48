//! Fallback chain properties.

use herald_common::test_utils::init_test_logging;
use herald_i18n::{
    args, LocalePreferences, LocaleResolver, Resolution, TranslationCatalog, Variant,
};
use proptest::prelude::*;

fn catalog() -> TranslationCatalog {
    TranslationCatalog::builder("en")
        .entry("ru", "only-ru", "только")
        .entry("en", "greeting", "Hello {0}")
        .entry("fr", "greeting", "Bonjour {0}")
        .entry("en", "farewell", "Bye")
        .build()
}

#[test]
fn test_terminal_default_reports_default_locale() {
    init_test_logging();
    let catalog = catalog();
    let prefs = LocalePreferences::new();
    let resolver = LocaleResolver::new(&catalog, &prefs);

    for requested in ["de", "fr", "zz-ZZ", ""] {
        let resolution = resolver.resolve_with_fallback("farewell", requested);
        assert_eq!(resolution.used_locale().unwrap(), "en", "requested {requested:?}");
    }
}

#[test]
fn test_catalog_without_default_entries_uses_first_locale() {
    init_test_logging();
    let catalog = TranslationCatalog::builder("en")
        .entry("es", "a", "uno")
        .entry("pt", "a", "um")
        .build();
    let prefs = LocalePreferences::new();
    let resolver = LocaleResolver::new(&catalog, &prefs);

    let resolution = resolver.resolve_with_fallback("a", "de");
    assert_eq!(resolution.used_locale().unwrap(), "es");
    assert_eq!(resolution.render("a", &[], Variant::Plain).as_str(), "uno");
}

#[test]
fn test_empty_catalog_renders_raw_key() {
    init_test_logging();
    let catalog = TranslationCatalog::empty("en");
    let prefs = LocalePreferences::new();
    let resolver = LocaleResolver::new(&catalog, &prefs);

    let resolution = resolver.resolve_with_fallback("kick-message", "fr");
    assert_eq!(resolution, Resolution::RawKey);
    assert_eq!(
        resolution
            .render("kick-message", &args!["Ann", "spam"], Variant::Markup)
            .as_str(),
        "kick-message - Ann, spam"
    );
}

proptest! {
    #[test]
    fn prop_fallback_is_total(key in "[a-z-]{0,12}", locale in "[a-zA-Z_-]{0,8}") {
        let catalog = catalog();
        let prefs = LocalePreferences::new();
        let resolver = LocaleResolver::new(&catalog, &prefs);

        let resolution = resolver.resolve_with_fallback(&key, &locale);
        let text = resolution.render(&key, &args!["x"], Variant::Markup);
        prop_assert!(!text.as_str().is_empty());
        if let Some(used) = resolution.used_locale() {
            prop_assert!(catalog.contains(&key, used.as_str()));
        }
    }

    #[test]
    fn prop_existing_entry_is_found_for_its_own_locale(index in 0usize..4) {
        let entries = [
            ("ru", "only-ru"),
            ("en", "greeting"),
            ("fr", "greeting"),
            ("en", "farewell"),
        ];
        let (locale, key) = entries[index];
        let catalog = catalog();
        let prefs = LocalePreferences::new();
        let resolver = LocaleResolver::new(&catalog, &prefs);

        let resolution = resolver.resolve_with_fallback(key, locale);
        prop_assert_eq!(resolution.used_locale().map(|l| l.as_str()), Some(locale));
    }
}
