//! Text colors and `<color=#rrggbb>` markup handling
//!
//! Color is extracted once when a template is loaded. Formatting never
//! re-parses markup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const OPEN_PREFIX: &str = "<color=#";
const CLOSE_TAG: &str = "</color>";

/// An RGB text color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

/// A color string that is not `#rrggbb` / `rrggbb`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0:?}")]
pub struct ParseColorError(pub String);

impl Color {
    /// Plain white, the usual fallback chat color
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Build a color from its channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb` (case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ParseColorError(hex.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Wrap `text` in color markup
    pub fn wrap(self, text: &str) -> String {
        format!("{OPEN_PREFIX}{:02x}{:02x}{:02x}>{text}{CLOSE_TAG}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Split a template fully wrapped in `<color=#rrggbb>…</color>` into its color
/// and inner text. Partial or nested-only markup is left alone.
pub fn extract_color(template: &str) -> Option<(Color, &str)> {
    let rest = template.strip_prefix(OPEN_PREFIX)?;
    let close = rest.find('>')?;
    let color = Color::from_hex(&rest[..close]).ok()?;
    let inner = rest[close + 1..].strip_suffix(CLOSE_TAG)?;
    Some((color, inner))
}
