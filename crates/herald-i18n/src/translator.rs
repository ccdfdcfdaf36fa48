//! The translation facade used at message-send call sites
//!
//! None of these methods fail: a missing template walks the fallback chain
//! and a broken one degrades to visible text.

use crate::catalog::{CatalogHandle, TranslationCatalog};
use crate::color::Color;
use crate::composer::{ContentComposer, Listing, ListingRegistry, ViewerState};
use crate::duration::{DurationHumanizer, DurationInput};
use crate::format::{join_args, Arg, Variant};
use crate::grouping::{LanguageGroup, LanguageGrouper, Recipient};
use crate::locale::{LocalePreferences, RecipientIdentity};
use crate::resolver::LocaleResolver;
use std::sync::Arc;
use tracing::{error, warn};

/// One formatted message for a whole language group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMessage<'g, T> {
    /// The recipients this text is for
    pub group: &'g LanguageGroup<T>,
    /// Color-stripped text
    pub text: String,
    /// Template color, or the translator's default
    pub color: Color,
}

/// Catalog snapshot, preference store and default color behind one API
#[derive(Debug)]
pub struct Translator {
    catalog: CatalogHandle,
    preferences: Arc<LocalePreferences>,
    default_color: Color,
}

impl Translator {
    /// Create a translator over a catalog and a shared preference store
    pub fn new(catalog: TranslationCatalog, preferences: Arc<LocalePreferences>) -> Self {
        Self {
            catalog: CatalogHandle::new(catalog),
            preferences,
            default_color: Color::WHITE,
        }
    }

    /// Color returned for templates without one
    pub fn with_default_color(mut self, color: Color) -> Self {
        self.default_color = color;
        self
    }

    /// Current catalog snapshot
    pub fn catalog(&self) -> Arc<TranslationCatalog> {
        self.catalog.get()
    }

    /// The shared preference store
    pub fn preferences(&self) -> &Arc<LocalePreferences> {
        &self.preferences
    }

    /// The configured default color
    pub fn default_color(&self) -> Color {
        self.default_color
    }

    /// Swap in a new catalog, returning the previous snapshot
    pub fn reload(&self, catalog: TranslationCatalog) -> Arc<TranslationCatalog> {
        self.catalog.update(catalog)
    }

    /// Render `key` for `identity`, keeping any color markup
    pub fn translate(
        &self,
        key: &str,
        identity: impl Into<RecipientIdentity>,
        args: &[Arg],
    ) -> String {
        let identity = identity.into();
        self.with_resolver(|resolver| {
            let locale = resolver.effective_locale(&identity);
            render_markup(&resolver, key, locale.as_str(), args)
        })
    }

    /// Like [`Self::translate`] for call sites that may have no key at all
    pub fn translate_opt(
        &self,
        key: Option<&str>,
        identity: impl Into<RecipientIdentity>,
        args: &[Arg],
    ) -> String {
        let key = key.unwrap_or_else(|| {
            error!("Translation requested without a key ({} argument(s))", args.len());
            ""
        });
        self.translate(key, identity, args)
    }

    /// Render the color-stripped text together with its color
    pub fn format_with_color(
        &self,
        key: &str,
        identity: impl Into<RecipientIdentity>,
        args: &[Arg],
    ) -> (String, Color) {
        let identity = identity.into();
        self.with_resolver(|resolver| {
            let locale = resolver.effective_locale(&identity);
            self.render_colored(&resolver, key, locale.as_str(), args)
        })
    }

    /// Format once per group
    pub fn translate_groups<'g, T>(
        &self,
        groups: &'g [LanguageGroup<T>],
        key: &str,
        args: &[Arg],
    ) -> Vec<GroupMessage<'g, T>> {
        self.with_resolver(|resolver| {
            groups
                .iter()
                .map(|group| {
                    let (text, color) =
                        self.render_colored(&resolver, key, group.locale().as_str(), args);
                    GroupMessage { group, text, color }
                })
                .collect()
        })
    }

    /// Group `recipients`, format once per locale and hand each member its text.
    ///
    /// Returns the number of recipients delivered to.
    pub fn broadcast<T, I, F>(
        &self,
        grouper: &mut LanguageGrouper<T>,
        recipients: I,
        key: &str,
        args: &[Arg],
        mut sink: F,
    ) -> usize
    where
        T: Recipient,
        I: IntoIterator<Item = T>,
        F: FnMut(&T, &str),
    {
        self.with_resolver(|resolver| {
            let mut delivered = 0;
            for group in grouper.group(recipients, &resolver) {
                let text = render_markup(&resolver, key, group.locale().as_str(), args);
                for member in group.members() {
                    sink(member, &text);
                    delivered += 1;
                }
            }
            delivered
        })
    }

    /// "1 hour and 1 minute" style text from seconds
    pub fn time_from_seconds(
        &self,
        seconds: u64,
        identity: impl Into<RecipientIdentity>,
    ) -> String {
        self.humanize(seconds, DurationInput::Seconds, identity.into())
    }

    /// "1 hour and 30 minutes" style text from minutes
    pub fn time_from_minutes(
        &self,
        minutes: u64,
        identity: impl Into<RecipientIdentity>,
    ) -> String {
        self.humanize(minutes, DurationInput::Minutes, identity.into())
    }

    /// Listing text for a viewer
    pub fn compose(&self, listing: &Listing, viewer: &ViewerState) -> String {
        self.with_resolver(|resolver| ContentComposer::new(resolver).compose(listing, viewer))
    }

    /// Listing text for an item id
    pub fn compose_by_id<R>(&self, item_id: &str, registry: &R, viewer: &ViewerState) -> String
    where
        R: ListingRegistry + ?Sized,
    {
        self.with_resolver(|resolver| {
            ContentComposer::new(resolver).compose_by_id(item_id, registry, viewer)
        })
    }

    fn humanize(&self, amount: u64, input: DurationInput, identity: RecipientIdentity) -> String {
        self.with_resolver(|resolver| {
            let locale = resolver.effective_locale(&identity);
            DurationHumanizer::new(resolver).humanize(amount, input, locale.as_str())
        })
    }

    fn render_colored(
        &self,
        resolver: &LocaleResolver<'_>,
        key: &str,
        locale: &str,
        args: &[Arg],
    ) -> (String, Color) {
        if key.is_empty() {
            return (empty_key_text(args), self.default_color);
        }
        let resolution = resolver.resolve_with_fallback(key, locale);
        let color = resolution
            .record()
            .and_then(|record| record.color())
            .unwrap_or(self.default_color);
        let text = resolution.render(key, args, Variant::Plain).into_string();
        (text, color)
    }

    fn with_resolver<R>(&self, f: impl FnOnce(LocaleResolver<'_>) -> R) -> R {
        let catalog = self.catalog.get();
        f(LocaleResolver::new(&catalog, &self.preferences))
    }
}

fn render_markup(resolver: &LocaleResolver<'_>, key: &str, locale: &str, args: &[Arg]) -> String {
    if key.is_empty() {
        return empty_key_text(args);
    }
    resolver
        .resolve_with_fallback(key, locale)
        .render(key, args, Variant::Markup)
        .into_string()
}

fn empty_key_text(args: &[Arg]) -> String {
    warn!(
        "Empty translation key sent with {} argument(s); echoing arguments",
        args.len()
    );
    join_args(args)
}
