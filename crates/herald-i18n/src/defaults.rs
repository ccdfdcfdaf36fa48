//! Built-in English templates for the keys the engine itself renders
//!
//! Loaded with [`CatalogBuilder::with_builtin_defaults`]; entries authored in
//! definition tables override these.
//!
//! [`CatalogBuilder::with_builtin_defaults`]: crate::catalog::CatalogBuilder::with_builtin_defaults

use crate::composer::keys as listing;
use crate::duration::{DurationUnit, AND_KEY};

/// Locale the built-in table is registered under
pub const BUILTIN_LOCALE: &str = "en";

/// One row of the built-in table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinEntry {
    /// Translation key
    pub key: &'static str,
    /// English template
    pub template: &'static str,
    /// Declared argument count
    pub args: Option<usize>,
}

const fn entry(key: &'static str, template: &'static str, args: usize) -> BuiltinEntry {
    BuiltinEntry {
        key,
        template,
        args: Some(args),
    }
}

/// The built-in English table
pub const BUILTIN_ENGLISH: &[BuiltinEntry] = &[
    entry(DurationUnit::Second.singular_key(), "second", 0),
    entry(DurationUnit::Second.plural_key(), "seconds", 0),
    entry(DurationUnit::Minute.singular_key(), "minute", 0),
    entry(DurationUnit::Minute.plural_key(), "minutes", 0),
    entry(DurationUnit::Hour.singular_key(), "hour", 0),
    entry(DurationUnit::Hour.plural_key(), "hours", 0),
    entry(DurationUnit::Day.singular_key(), "day", 0),
    entry(DurationUnit::Day.plural_key(), "days", 0),
    entry(DurationUnit::Month.singular_key(), "month", 0),
    entry(DurationUnit::Month.plural_key(), "months", 0),
    entry(DurationUnit::Year.singular_key(), "year", 0),
    entry(DurationUnit::Year.plural_key(), "years", 0),
    entry(AND_KEY, "and", 0),
    entry(listing::HEADER, "<color=#f0a31c>{0}</color>", 1),
    entry(listing::OWNED, "<color=#66ff99>Owned</color>", 0),
    entry(listing::COST, "<color=#c8e6ff>Cost: {0:N0} credits</color>", 2),
    entry(
        listing::COST_UNAFFORDABLE,
        "<color=#ff6666>Cost: {0:N0} credits (you have {1:N0})</color>",
        2,
    ),
    entry(listing::LEVEL, "<color=#ffcc66>Requires level {0}</color>", 1),
    entry(listing::FREE, "<color=#66ff99>Free</color>", 0),
    entry(listing::CONTENTS, "<color=#bfbfbf>{0}</color>", 1),
    entry(listing::UNLIMITED, "<color=#bfbfbf>Unlimited</color>", 0),
    entry(listing::AVAILABLE, "<color=#66ff99>{0}/{1} in use</color>", 2),
    entry(listing::UNAVAILABLE, "<color=#ff6666>{0}/{1} in use</color>", 2),
    entry(listing::FRAME, "{0}\n{1}\n{2}", 3),
    entry(listing::FRAME_CONTENTS, "{0}\n{1}\n{2}\n{3}", 4),
    entry(listing::UNKNOWN, "<color=#ff6666>Unknown item: {0}</color>", 1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::placeholder_arity;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_keys_are_unique() {
        let keys: HashSet<_> = BUILTIN_ENGLISH.iter().map(|e| e.key).collect();
        assert_eq!(keys.len(), BUILTIN_ENGLISH.len());
    }

    #[test]
    fn test_builtin_templates_match_declared_args() {
        for entry in BUILTIN_ENGLISH {
            let arity = placeholder_arity(entry.template).unwrap();
            assert!(
                arity <= entry.args.unwrap_or(0),
                "{} uses {} placeholders",
                entry.key,
                arity
            );
        }
    }

    #[test]
    fn test_every_duration_unit_is_covered() {
        for unit in DurationUnit::ALL {
            for key in [unit.singular_key(), unit.plural_key()] {
                assert!(BUILTIN_ENGLISH.iter().any(|e| e.key == key), "missing {key}");
            }
        }
    }
}
