//! Identity value objects
//!
//! String newtypes for the two identities the poll core tracks:
//! participants and zones.

use serde::{Deserialize, Serialize};

/// Unique identifier for a participant.
///
/// The hosting runtime decides what goes inside (a UUID, an account name);
/// the core only compares and hashes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates a ParticipantId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for ParticipantId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a zone, unique within the hosting runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneName(String);

impl ZoneName {
    /// Creates a ZoneName from an existing string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for ZoneName {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ZoneName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_roundtrip() {
        let id = ParticipantId::new("d5a3");
        assert_eq!(id.as_str(), "d5a3");
        assert_eq!(id.to_string(), "d5a3");
    }

    #[test]
    fn test_zone_name_from_str() {
        let zone: ZoneName = "overworld".into();
        assert_eq!(zone, ZoneName::new("overworld"));
    }
}
