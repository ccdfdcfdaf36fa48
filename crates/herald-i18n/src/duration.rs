//! Human-readable durations with at most two units
//!
//! Unit lengths are fixed approximations: a month is 2 628 000 seconds
//! (30.416 days) and a year is twelve of those. No calendar arithmetic.

use crate::format::Variant;
use crate::resolver::LocaleResolver;
use std::time::Duration;
use tracing::debug;

/// Key for the word joining the two units ("and")
pub const AND_KEY: &str = "time-and";

/// Seconds in a minute
pub const SECONDS_PER_MINUTE: u64 = 60;
/// Seconds in an hour
pub const SECONDS_PER_HOUR: u64 = 3_600;
/// Seconds in a day
pub const SECONDS_PER_DAY: u64 = 86_400;
/// Seconds in a (30.416 day) month
pub const SECONDS_PER_MONTH: u64 = 2_628_000;
/// Seconds in a (twelve month) year
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// A display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DurationUnit {
    /// Seconds
    Second,
    /// Minutes
    Minute,
    /// Hours
    Hour,
    /// Days
    Day,
    /// Months
    Month,
    /// Years
    Year,
}

impl DurationUnit {
    /// Every unit, smallest first
    pub const ALL: [Self; 6] = [
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Month,
        Self::Year,
    ];

    /// Length of one unit in seconds
    pub const fn seconds(self) -> u64 {
        match self {
            Self::Second => 1,
            Self::Minute => SECONDS_PER_MINUTE,
            Self::Hour => SECONDS_PER_HOUR,
            Self::Day => SECONDS_PER_DAY,
            Self::Month => SECONDS_PER_MONTH,
            Self::Year => SECONDS_PER_YEAR,
        }
    }

    /// Catalog key for a quantity of exactly one
    pub const fn singular_key(self) -> &'static str {
        match self {
            Self::Second => "time-second-one",
            Self::Minute => "time-minute-one",
            Self::Hour => "time-hour-one",
            Self::Day => "time-day-one",
            Self::Month => "time-month-one",
            Self::Year => "time-year-one",
        }
    }

    /// Catalog key for any other quantity
    pub const fn plural_key(self) -> &'static str {
        match self {
            Self::Second => "time-second-other",
            Self::Minute => "time-minute-other",
            Self::Hour => "time-hour-other",
            Self::Day => "time-day-other",
            Self::Month => "time-month-other",
            Self::Year => "time-year-other",
        }
    }

    /// Key for `quantity` of this unit
    pub const fn key_for(self, quantity: u64) -> &'static str {
        if quantity == 1 {
            self.singular_key()
        } else {
            self.plural_key()
        }
    }

    const fn smaller(self) -> Self {
        match self {
            Self::Second | Self::Minute => Self::Second,
            Self::Hour => Self::Minute,
            Self::Day => Self::Hour,
            Self::Month => Self::Day,
            Self::Year => Self::Month,
        }
    }
}

/// What the input amount counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationInput {
    /// Amount is in seconds
    Seconds,
    /// Amount is in minutes
    Minutes,
}

/// A duration split into its leading unit and the next smaller one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    /// Leading unit
    pub unit: DurationUnit,
    /// Whole quantity of the leading unit
    pub quantity: u64,
    /// Remainder in the next smaller unit; zero for seconds
    pub remainder: u64,
}

impl DurationParts {
    /// Split a number of seconds
    pub const fn from_seconds(seconds: u64) -> Self {
        let unit = if seconds < SECONDS_PER_MINUTE {
            DurationUnit::Second
        } else if seconds < SECONDS_PER_HOUR {
            DurationUnit::Minute
        } else if seconds < SECONDS_PER_DAY {
            DurationUnit::Hour
        } else if seconds < SECONDS_PER_MONTH {
            DurationUnit::Day
        } else if seconds < SECONDS_PER_YEAR {
            DurationUnit::Month
        } else {
            DurationUnit::Year
        };

        let quantity = seconds / unit.seconds();
        let remainder = match unit {
            DurationUnit::Second => 0,
            _ => (seconds % unit.seconds()) / unit.smaller().seconds(),
        };

        Self {
            unit,
            quantity,
            remainder,
        }
    }

    /// Split an amount of the given input kind
    pub const fn from_amount(amount: u64, input: DurationInput) -> Self {
        match input {
            DurationInput::Seconds => Self::from_seconds(amount),
            DurationInput::Minutes => {
                let parts = Self::from_seconds(amount.saturating_mul(SECONDS_PER_MINUTE));
                match parts.unit {
                    // minutes never render below their own unit
                    DurationUnit::Second => Self {
                        unit: DurationUnit::Minute,
                        quantity: 0,
                        remainder: 0,
                    },
                    _ => parts,
                }
            }
        }
    }

    /// The smaller unit the remainder is counted in
    pub const fn remainder_unit(&self) -> DurationUnit {
        self.unit.smaller()
    }
}

/// Renders durations through the catalog's `time-*` keys
#[derive(Debug, Clone, Copy)]
pub struct DurationHumanizer<'a> {
    resolver: LocaleResolver<'a>,
}

impl<'a> DurationHumanizer<'a> {
    /// Create a humanizer over a resolver
    pub fn new(resolver: LocaleResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Render `amount` in `locale`, e.g. "1 hour and 30 minutes"
    pub fn humanize(&self, amount: u64, input: DurationInput, locale: &str) -> String {
        let parts = DurationParts::from_amount(amount, input);
        let mut out = format!(
            "{} {}",
            parts.quantity,
            self.word(parts.unit.key_for(parts.quantity), locale)
        );
        if parts.remainder != 0 {
            let smaller = parts.remainder_unit();
            out.push(' ');
            out.push_str(&self.word(AND_KEY, locale));
            out.push(' ');
            out.push_str(&parts.remainder.to_string());
            out.push(' ');
            out.push_str(&self.word(smaller.key_for(parts.remainder), locale));
        }
        out
    }

    /// Like [`Self::humanize`], treating negative amounts as zero
    pub fn humanize_signed(&self, amount: i64, input: DurationInput, locale: &str) -> String {
        let amount = u64::try_from(amount).unwrap_or_else(|_| {
            debug!("Negative duration {} clamped to zero", amount);
            0
        });
        self.humanize(amount, input, locale)
    }

    /// Render a [`Duration`] using its whole seconds
    pub fn humanize_duration(&self, duration: Duration, locale: &str) -> String {
        self.humanize(duration.as_secs(), DurationInput::Seconds, locale)
    }

    fn word(&self, key: &str, locale: &str) -> String {
        self.resolver
            .resolve_with_fallback(key, locale)
            .render(key, &[], Variant::Plain)
            .into_string()
    }
}
