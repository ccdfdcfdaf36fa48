//! Viewer-conditioned listing text
//!
//! A listing renders as a header, one requirement line chosen by precedence,
//! an optional contents line and an availability line, assembled by a
//! locale-resolved frame template. Missing templates degrade to raw keys, so
//! the result is never empty.

use crate::format::{join_args, Arg, Variant};
use crate::locale::RecipientIdentity;
use crate::resolver::{LocaleResolver, Resolution};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// Catalog keys the composer renders through
pub mod keys {
    /// Item name line; {0} upper-cased name
    pub const HEADER: &str = "listing-header";
    /// Viewer already owns the item
    pub const OWNED: &str = "listing-owned";
    /// Purchase required and affordable; {0} cost, {1} balance
    pub const COST: &str = "listing-cost";
    /// Purchase required, balance too low; {0} cost, {1} balance
    pub const COST_UNAFFORDABLE: &str = "listing-cost-unaffordable";
    /// Level required; {0} level
    pub const LEVEL: &str = "listing-level";
    /// No requirement
    pub const FREE: &str = "listing-free";
    /// Sub-items; {0} names joined by ", "
    pub const CONTENTS: &str = "listing-contents";
    /// No capacity limit
    pub const UNLIMITED: &str = "listing-unlimited";
    /// Below capacity; {0} in use, {1} max
    pub const AVAILABLE: &str = "listing-available";
    /// At capacity; {0} in use, {1} max
    pub const UNAVAILABLE: &str = "listing-unavailable";
    /// Layout; {0} header, {1} requirement, {2} availability
    pub const FRAME: &str = "listing-frame";
    /// Layout with contents; {0} header, {1} requirement, {2} contents, {3} availability
    pub const FRAME_CONTENTS: &str = "listing-frame-contents";
    /// Unknown item id; {0} id
    pub const UNKNOWN: &str = "listing-unknown";
}

/// How many of an item may be in use at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    /// No limit
    #[default]
    Unlimited,
    /// Limited to `max`, with `in_use` currently taken
    Limited {
        /// Currently in use
        in_use: u32,
        /// Upper bound
        max: u32,
    },
}

/// An item that can be displayed to viewers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Stable item id
    pub id: String,
    /// Catalog key for the display name
    pub name_key: String,
    /// Purchase cost; zero means none
    #[serde(default)]
    pub cost: u64,
    /// Level required to use the item; zero means none
    #[serde(default)]
    pub required_level: u32,
    /// Catalog keys of contained sub-items
    #[serde(default)]
    pub contents: Vec<String>,
    /// Capacity rule
    #[serde(default)]
    pub capacity: Capacity,
}

impl Listing {
    /// A listing with no cost, level or capacity limit
    pub fn new(id: impl Into<String>, name_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name_key: name_key.into(),
            ..Self::default()
        }
    }

    /// Set the purchase cost
    pub fn with_cost(mut self, cost: u64) -> Self {
        self.cost = cost;
        self
    }

    /// Set the required level
    pub fn with_required_level(mut self, level: u32) -> Self {
        self.required_level = level;
        self
    }

    /// Set the sub-item keys
    pub fn with_contents<I, S>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contents = contents.into_iter().map(Into::into).collect();
        self
    }

    /// Set the capacity rule
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }
}

/// What the composer knows about the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerState {
    /// Who is looking; decides the locale
    pub identity: RecipientIdentity,
    /// Current level
    pub level: u32,
    /// Spendable balance
    pub balance: u64,
    /// Ids of owned items
    pub owned: BTreeSet<String>,
}

impl ViewerState {
    /// A viewer with nothing owned, level zero and no balance
    pub fn new(identity: impl Into<RecipientIdentity>) -> Self {
        Self {
            identity: identity.into(),
            level: 0,
            balance: 0,
            owned: BTreeSet::new(),
        }
    }

    /// Set the level
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Set the balance
    pub fn with_balance(mut self, balance: u64) -> Self {
        self.balance = balance;
        self
    }

    /// Mark an item as owned
    pub fn owning(mut self, id: impl Into<String>) -> Self {
        self.owned.insert(id.into());
        self
    }

    /// Whether the viewer owns the item
    pub fn owns(&self, id: &str) -> bool {
        self.owned.contains(id)
    }
}

/// Lookup of listings by id
pub trait ListingRegistry {
    /// The listing for `id`, if any
    fn listing(&self, id: &str) -> Option<&Listing>;
}

impl ListingRegistry for HashMap<String, Listing> {
    fn listing(&self, id: &str) -> Option<&Listing> {
        self.get(id)
    }
}

impl ListingRegistry for BTreeMap<String, Listing> {
    fn listing(&self, id: &str) -> Option<&Listing> {
        self.get(id)
    }
}

impl ListingRegistry for [Listing] {
    fn listing(&self, id: &str) -> Option<&Listing> {
        self.iter().find(|listing| listing.id == id)
    }
}

impl ListingRegistry for Vec<Listing> {
    fn listing(&self, id: &str) -> Option<&Listing> {
        self.as_slice().listing(id)
    }
}

/// Which requirement line applies to a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Already owned
    Owned,
    /// Must be bought
    Purchase {
        /// Item cost
        cost: u64,
        /// Whether the balance covers it
        affordable: bool,
    },
    /// Viewer level is too low
    Level(u32),
    /// Nothing stands in the way
    Free,
}

impl Requirement {
    /// Evaluate in precedence order: owned, purchase, level, free
    pub fn evaluate(listing: &Listing, viewer: &ViewerState) -> Self {
        if viewer.owns(&listing.id) {
            Self::Owned
        } else if listing.cost > 0 {
            Self::Purchase {
                cost: listing.cost,
                affordable: viewer.balance >= listing.cost,
            }
        } else if listing.required_level > viewer.level {
            Self::Level(listing.required_level)
        } else {
            Self::Free
        }
    }
}

/// Builds listing text through the catalog
#[derive(Debug, Clone, Copy)]
pub struct ContentComposer<'a> {
    resolver: LocaleResolver<'a>,
}

impl<'a> ContentComposer<'a> {
    /// Create a composer over a resolver
    pub fn new(resolver: LocaleResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Compose the full text of `listing` for `viewer`
    pub fn compose(&self, listing: &Listing, viewer: &ViewerState) -> String {
        let locale = self.resolver.effective_locale(&viewer.identity);
        let locale = locale.as_str();

        let header = self.header(listing, locale);
        let requirement = self.requirement(listing, viewer, locale);
        let availability = self.availability(listing.capacity, locale);

        let contents = if listing.contents.is_empty() {
            None
        } else {
            Some(self.contents(listing, locale))
        };

        let composed = match &contents {
            None => self.line(
                keys::FRAME,
                locale,
                &[
                    header.clone().into(),
                    requirement.clone().into(),
                    availability.clone().into(),
                ],
            ),
            Some(contents) => self.line(
                keys::FRAME_CONTENTS,
                locale,
                &[
                    header.clone().into(),
                    requirement.clone().into(),
                    contents.clone().into(),
                    availability.clone().into(),
                ],
            ),
        };

        if composed.trim().is_empty() {
            warn!(
                "Listing frame for {} rendered empty in {}, joining lines",
                listing.id, locale
            );
            return [Some(header), Some(requirement), contents, Some(availability)]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join("\n");
        }
        composed
    }

    /// Compose the listing with id `item_id`, or the unknown-item line
    pub fn compose_by_id<R>(&self, item_id: &str, registry: &R, viewer: &ViewerState) -> String
    where
        R: ListingRegistry + ?Sized,
    {
        match registry.listing(item_id) {
            Some(listing) => self.compose(listing, viewer),
            None => {
                debug!("No listing with id {}", item_id);
                let locale = self.resolver.effective_locale(&viewer.identity);
                let text = self.line(keys::UNKNOWN, locale.as_str(), &[item_id.into()]);
                if text.is_empty() {
                    item_id.to_string()
                } else {
                    text
                }
            }
        }
    }

    fn header(&self, listing: &Listing, locale: &str) -> String {
        let name = match self.resolver.resolve_with_fallback(&listing.name_key, locale) {
            found @ Resolution::Found { .. } => found
                .render(&listing.name_key, &[], Variant::Plain)
                .into_string(),
            Resolution::RawKey => listing.id.clone(),
        };
        self.line(keys::HEADER, locale, &[name.to_uppercase().into()])
    }

    fn requirement(&self, listing: &Listing, viewer: &ViewerState, locale: &str) -> String {
        match Requirement::evaluate(listing, viewer) {
            Requirement::Owned => self.line(keys::OWNED, locale, &[]),
            Requirement::Purchase { cost, affordable } => {
                let key = if affordable {
                    keys::COST
                } else {
                    keys::COST_UNAFFORDABLE
                };
                self.line(key, locale, &[cost.into(), viewer.balance.into()])
            }
            Requirement::Level(level) => self.line(keys::LEVEL, locale, &[level.into()]),
            Requirement::Free => self.line(keys::FREE, locale, &[]),
        }
    }

    fn contents(&self, listing: &Listing, locale: &str) -> String {
        let names: Vec<Arg> = listing
            .contents
            .iter()
            .map(|key| {
                self.resolver
                    .resolve_with_fallback(key, locale)
                    .render(key, &[], Variant::Plain)
                    .into_string()
                    .into()
            })
            .collect();
        self.line(keys::CONTENTS, locale, &[join_args(&names).into()])
    }

    fn availability(&self, capacity: Capacity, locale: &str) -> String {
        match capacity {
            Capacity::Unlimited => self.line(keys::UNLIMITED, locale, &[]),
            Capacity::Limited { in_use, max } => {
                let key = if in_use < max {
                    keys::AVAILABLE
                } else {
                    keys::UNAVAILABLE
                };
                self.line(key, locale, &[in_use.into(), max.into()])
            }
        }
    }

    fn line(&self, key: &str, locale: &str, args: &[Arg]) -> String {
        self.resolver
            .resolve_with_fallback(key, locale)
            .render(key, args, Variant::Markup)
            .into_string()
    }
}
