//! Loading configuration and definition tables from disk.

use herald_common::test_utils::init_test_logging;
use herald_common::RecipientId;
use herald_config::{build_catalog, build_translator, ConfigError, ConfigLoader};
use herald_i18n::{args, Color, LocalePreferences};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn write_fixture(dir: &TempDir) {
    fs::create_dir_all(dir.path().join("lang")).unwrap();
    fs::write(
        dir.path().join("lang/base.toml"),
        r##"default_locale = "en"

[[entries]]
key = "welcome"
args = 1
[entries.templates]
en = "<color=#00ff00>Welcome {0}</color>"
fr = "Bienvenue {0}"

[[entries]]
key = "balance"
args = 1
formats = ["N0"]
[entries.templates]
en = "Balance: {0}"
"##,
    )
    .unwrap();
    fs::write(
        dir.path().join("lang/extra.yaml"),
        "entries:
  - key: welcome
    args: 1
    templates:
      de: \"Willkommen {0}\"
  - key: score
    templates:
      en: \"{0} points\"
      ru: \"{0} очков из {1}\"
",
    )
    .unwrap();
    fs::write(
        dir.path().join("lang/overrides.json"),
        r#"{"entries": [{"key": "time-and", "templates": {"en": "&"}}]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("herald.toml"),
        r##"[localization]
default_locale = "en"
default_color = "#c0c0c0"
catalog_paths = ["lang/base.toml", "lang/extra.yaml", "lang/overrides.json"]

[logging]
level = "warn"
"##,
    )
    .unwrap();
}

#[test]
fn test_translator_from_config_directory() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    write_fixture(&dir);

    let config = ConfigLoader::discover(None, dir.path()).unwrap();
    let preferences = Arc::new(LocalePreferences::new());
    preferences.set(RecipientId(1), "de");
    let translator = build_translator(&config, Arc::clone(&preferences)).unwrap();

    assert_eq!(translator.translate("welcome", RecipientId(1), &args!["Ann"]), "Willkommen Ann");
    assert_eq!(translator.translate("welcome", "fr", &args!["Ann"]), "Bienvenue Ann");
    assert_eq!(translator.translate("balance", "fr", &args![12_500]), "Balance: 12,500");
    assert_eq!(
        translator.format_with_color("welcome", "de", &args!["Bo"]),
        ("Willkommen Bo".to_string(), Color::rgb(0xc0, 0xc0, 0xc0))
    );
    // authored entry wins over the built-in table
    assert_eq!(translator.time_from_seconds(61, "en"), "1 minute & 1 second");
}

#[test]
fn test_strict_validation_flags_cross_locale_arity() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    write_fixture(&dir);

    let mut config = ConfigLoader::discover(None, dir.path()).unwrap();
    assert!(build_catalog(&config).unwrap().invalid_entries().is_empty());

    config.localization.strict_validation = true;
    let catalog = build_catalog(&config).unwrap();
    let flagged: Vec<_> = catalog
        .invalid_entries()
        .iter()
        .map(|(locale, key)| (locale.as_str(), key.as_str()))
        .collect();
    assert_eq!(flagged, vec![("ru", "score")]);
}

#[test]
fn test_missing_definition_file() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir);
    fs::remove_file(dir.path().join("lang/extra.yaml")).unwrap();

    let config = ConfigLoader::discover(None, dir.path()).unwrap();
    assert!(matches!(build_catalog(&config), Err(ConfigError::IoError { .. })));

    let err = build_translator(&config, Arc::new(LocalePreferences::new())).unwrap_err();
    assert!(err.to_string().contains("Failed to build translation catalog"));
}

#[test]
fn test_empty_key_in_definition_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"entries": [{"key": "", "templates": {"en": "x"}}]}"#).unwrap();

    let mut config = herald_config::Config::default();
    config.localization.catalog_paths = vec![path];
    match build_catalog(&config) {
        Err(ConfigError::CatalogError { source, .. }) => {
            assert_eq!(source, herald_i18n::I18nError::EmptyKey { index: 0 });
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
