//! Common type definitions and newtype wrappers for domain modeling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a message recipient (a connected player, a console, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(pub u64);

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecipientId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Team a recipient currently plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Squad within a team. Squad ids are only unique per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquadId(pub u8);

impl fmt::Display for SquadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Permission tier of a recipient, as already decided by the host.
///
/// Ordered from least to most privileged so filters can use `>=`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// Regular player
    #[default]
    Member,
    /// Trial staff
    Helper,
    /// Moderator
    Moderator,
    /// Server administrator
    Admin,
}

impl PermissionLevel {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Helper => "helper",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
