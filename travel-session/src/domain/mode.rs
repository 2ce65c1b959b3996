//! Transport mode enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown transport mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: {0:?} (expected drive, walk or transit)")]
pub struct UnknownMode(String);

/// The travel method a route is computed for.
///
/// The ordinal values are stable: `Drive` is 0 and doubles as the fallback
/// for any unrecognised ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Drive = 0,
    Walk = 1,
    Transit = 2,
}

impl TransportMode {
    /// All modes in ordinal order.
    pub const ALL: [TransportMode; 3] = [
        TransportMode::Drive,
        TransportMode::Walk,
        TransportMode::Transit,
    ];

    /// Returns the stable ordinal.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Maps an ordinal back to a mode, falling back to `Drive`.
    pub const fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            1 => TransportMode::Walk,
            2 => TransportMode::Transit,
            _ => TransportMode::Drive,
        }
    }

    /// Lowercase identifier, also used for fixture file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            TransportMode::Drive => "drive",
            TransportMode::Walk => "walk",
            TransportMode::Transit => "transit",
        }
    }

    /// Human-readable label for selectors.
    pub const fn label(self) -> &'static str {
        match self {
            TransportMode::Drive => "Driving",
            TransportMode::Walk => "Walking",
            TransportMode::Transit => "Transit",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drive" | "driving" | "car" => Ok(TransportMode::Drive),
            "walk" | "walking" => Ok(TransportMode::Walk),
            "transit" => Ok(TransportMode::Transit),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}
