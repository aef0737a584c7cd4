//! Ballot types
//!
//! A ballot is the single yes/no decision a participant casts. Parsing
//! accepts the chat shorthand the original interface used.

use serde::{Deserialize, Serialize};

/// A participant's yes/no decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ballot {
    Yes,
    No,
}

impl Ballot {
    /// Check if this ballot is a yes
    pub fn is_yes(&self) -> bool {
        matches!(self, Ballot::Yes)
    }
}

impl std::fmt::Display for Ballot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ballot::Yes => write!(f, "YES"),
            Ballot::No => write!(f, "NO"),
        }
    }
}

impl std::str::FromStr for Ballot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(Ballot::Yes),
            "n" | "no" => Ok(Ballot::No),
            _ => Err(format!("not a ballot: {}. Valid: y, yes, n, no", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ballot() {
        assert_eq!("y".parse::<Ballot>().ok(), Some(Ballot::Yes));
        assert_eq!("YES".parse::<Ballot>().ok(), Some(Ballot::Yes));
        assert_eq!("n".parse::<Ballot>().ok(), Some(Ballot::No));
        assert_eq!("No".parse::<Ballot>().ok(), Some(Ballot::No));
        assert_eq!(" yes ".parse::<Ballot>().ok(), Some(Ballot::Yes));
        assert!("maybe".parse::<Ballot>().is_err());
    }

    #[test]
    fn test_is_yes() {
        assert!(Ballot::Yes.is_yes());
        assert!(!Ballot::No.is_yes());
    }

    #[test]
    fn test_display() {
        assert_eq!(Ballot::Yes.to_string(), "YES");
        assert_eq!(Ballot::No.to_string(), "NO");
    }
}
