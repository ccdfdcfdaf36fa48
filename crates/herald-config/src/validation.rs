//! Field validators used by the configuration schema

use herald_i18n::Color;
use unic_langid::LanguageIdentifier;
use validator::ValidationError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a locale code as a BCP-47 language identifier (`_` accepted as `-`)
pub fn validate_locale(locale: &str) -> Result<(), ValidationError> {
    if locale.is_empty() {
        return Err(ValidationError::new("empty_locale"));
    }

    match locale.replace('_', "-").parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("invalid_locale")),
    }
}

/// Validate a `#RRGGBB` color
pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    if !color.starts_with('#') {
        return Err(ValidationError::new("invalid_hex_color"));
    }
    Color::from_hex(color)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_hex_color"))
}

/// Validate a log filter: a bare level or a `target=level` directive list
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if level.is_empty() {
        return Err(ValidationError::new("empty_log_level"));
    }

    let valid = level.split(',').map(str::trim).all(|directive| {
        let level = directive.rsplit('=').next().unwrap_or(directive);
        LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
    });
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_locale() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("pt-BR").is_ok());
        assert!(validate_locale("zh_Hant").is_ok());

        assert!(validate_locale("").is_err());
        assert!(validate_locale("not a locale").is_err());
        assert!(validate_locale("e").is_err());
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#FFCC00").is_ok());
        assert!(validate_color("#00ff7f").is_ok());

        assert!(validate_color("FFCC00").is_err());
        assert!(validate_color("#FFF").is_err());
        assert!(validate_color("#GG0000").is_err());
    }

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("info").is_ok());
        assert!(validate_log_level("WARN").is_ok());
        assert!(validate_log_level("info,herald_i18n=trace").is_ok());

        assert!(validate_log_level("").is_err());
        assert!(validate_log_level("verbose").is_err());
    }
}
