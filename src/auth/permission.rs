//! The ordered scale of trust levels.

use std::fmt;
use std::str::FromStr;

/// Trust level an actor holds, either globally or toward a specific target.
///
/// Variants are declared lowest first; the derived `Ord` is the platform's
/// rung sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionLevel {
    /// No access at all (disabled devices).
    Nobody,
    Enabled,
    Family,
    User,
    Device,
    Root,
    Admin,
}

impl PermissionLevel {
    /// The highest level. Only the administrator actor holds it.
    pub const MAX: PermissionLevel = PermissionLevel::Admin;

    /// All levels, lowest first.
    pub const ALL: [PermissionLevel; 7] = [
        PermissionLevel::Nobody,
        PermissionLevel::Enabled,
        PermissionLevel::Family,
        PermissionLevel::User,
        PermissionLevel::Device,
        PermissionLevel::Root,
        PermissionLevel::Admin,
    ];

    /// `self >= required`.
    #[inline]
    pub fn gte(self, required: PermissionLevel) -> bool {
        self >= required
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nobody => "nobody",
            Self::Enabled => "enabled",
            Self::Family => "family",
            Self::User => "user",
            Self::Device => "device",
            Self::Root => "root",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission level: {0}")]
pub struct UnknownLevel(pub String);

impl FromStr for PermissionLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}
