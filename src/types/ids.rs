//! Identifiers for accounts, trails, spots, discoveries and scan events.
//!
//! Entity ids issued by the backend are opaque strings; ids generated on the
//! client (scan events, clues) are UUID v4 values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error type for id parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("{0} id cannot be empty")]
    Empty(&'static str),
    #[error("invalid {kind} id format: {value}")]
    InvalidFormat { kind: &'static str, value: String },
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create an id, trimming surrounding whitespace.
            pub fn new(value: impl AsRef<str>) -> Result<Self, IdError> {
                let value = value.as_ref().trim();
                if value.is_empty() {
                    return Err(IdError::Empty($kind));
                }
                Ok(Self(value.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Account that owns scans and reactions.
    AccountId,
    "account"
);
string_id!(
    /// A walkable trail.
    TrailId,
    "trail"
);
string_id!(
    /// A point of interest on a trail.
    SpotId,
    "spot"
);
string_id!(
    /// A spot discovered by an account.
    DiscoveryId,
    "discovery"
);

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get a short representation (first 8 characters).
            pub fn short(&self) -> String {
                self.0.to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::parse_str(s).map_err(|_| IdError::InvalidFormat {
                    kind: $kind,
                    value: s.to_string(),
                })?;
                Ok(Self(uuid))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier of a completed scan.
    ScanEventId,
    "scan event"
);
uuid_id!(
    /// Unique identifier of a clue produced by a scan.
    ClueId,
    "clue"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id_trims() {
        let id = TrailId::new("  harbour-loop ").unwrap();
        assert_eq!(id.as_str(), "harbour-loop");
    }

    #[test]
    fn test_string_id_rejects_empty() {
        assert_eq!(AccountId::new("   "), Err(IdError::Empty("account")));
    }

    #[test]
    fn test_string_id_deserialize_validates() {
        let id: TrailId = serde_json::from_str("\" harbour \"").unwrap();
        assert_eq!(id.as_str(), "harbour");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"harbour\"");
        assert!(serde_json::from_str::<TrailId>("\"\"").is_err());
        assert!(serde_json::from_str::<SpotId>("\"   \"").is_err());
    }

    #[test]
    fn test_scan_event_id_generation() {
        let id1 = ScanEventId::new();
        let id2 = ScanEventId::new();
        assert_ne!(id1, id2);
        assert_eq!(id1.short().len(), 8);
    }

    #[test]
    fn test_scan_event_id_parse() {
        let id = ScanEventId::new();
        let parsed: ScanEventId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("abc".parse::<ScanEventId>().is_err());
    }
}
