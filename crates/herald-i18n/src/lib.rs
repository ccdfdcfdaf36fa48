//! Localization resolution and recipient batching for Herald
//!
//! This crate turns a translation key, a recipient and positional arguments
//! into displayable text. It includes:
//!
//! - An immutable translation catalog with load-time validation
//! - Locale resolution with a requested → default → first-locale → raw-key chain
//! - Positional formatting that degrades instead of failing
//! - Per-locale recipient grouping so broadcasts format once per language
//! - Duration humanizing and viewer-conditioned listing text
//!
//! # Example
//!
//! ```rust
//! use herald_i18n::{args, LocalePreferences, TranslationCatalog, Translator};
//! use herald_common::RecipientId;
//! use std::sync::Arc;
//!
//! let catalog = TranslationCatalog::builder("en")
//!     .entry("en", "welcome", "Welcome {0}")
//!     .entry("fr", "welcome", "Bienvenue {0}")
//!     .build();
//! let preferences = Arc::new(LocalePreferences::new());
//! preferences.set(RecipientId(7), "fr");
//!
//! let translator = Translator::new(catalog, preferences);
//! assert_eq!(translator.translate("welcome", RecipientId(7), &args!["Ann"]), "Bienvenue Ann");
//! assert_eq!(translator.translate("welcome", "de", &args!["Ann"]), "Welcome Ann");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod color;
pub mod composer;
pub mod defaults;
pub mod duration;
pub mod error;
pub mod format;
pub mod grouping;
pub mod locale;
pub mod resolver;
pub mod translator;

pub use catalog::{
    CatalogBuilder, CatalogDefinition, CatalogHandle, DefinitionEntry, TemplateFlags,
    TemplateRecord, TemplateSpec, TranslationCatalog,
};
pub use color::{Color, ParseColorError};
pub use composer::{Capacity, ContentComposer, Listing, ListingRegistry, Requirement, ViewerState};
pub use duration::{DurationHumanizer, DurationInput, DurationParts, DurationUnit};
pub use error::{I18nError, I18nResult};
pub use format::{format_template, Arg, FormatError, Formatter, Rendered, Variant};
pub use grouping::{LanguageGroup, LanguageGrouper, Recipient};
pub use locale::{Locale, LocalePreferences, RecipientIdentity};
pub use resolver::{LocaleResolver, Resolution};
pub use translator::{GroupMessage, Translator};
