//! Pass rule for poll decisions
//!
//! This module defines the rule used to determine whether a poll passes.

use serde::{Deserialize, Serialize};

/// Required share of yes votes among the final eligible set
///
/// A poll passes when all three hold:
/// - the final eligible set is non-empty,
/// - at least one yes vote was cast (even a threshold of zero never lets a
///   poll pass without one),
/// - the yes share meets or exceeds the threshold.
///
/// # Example
///
/// ```
/// use nightpoll_domain::PassThreshold;
///
/// let rule = PassThreshold::new(0.51);
/// assert!(!rule.is_met(2, 4)); // 0.5 < 0.51
/// assert!(rule.is_met(3, 4));  // 0.75 >= 0.51
///
/// let even = PassThreshold::new(0.5);
/// assert!(even.is_met(2, 4)); // 0.5 >= 0.5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassThreshold(f64);

impl PassThreshold {
    /// Create a threshold, clamping the ratio into 0.0..=1.0.
    pub fn new(ratio: f64) -> Self {
        Self(ratio.clamp(0.0, 1.0))
    }

    /// The required yes share (0.0 to 1.0).
    pub fn ratio(&self) -> f64 {
        self.0
    }

    /// Check if the rule is satisfied given yes votes and the final
    /// eligible count.
    pub fn is_met(&self, yes_votes: usize, eligible: usize) -> bool {
        if eligible == 0 || yes_votes == 0 {
            return false;
        }
        yes_votes as f64 / eligible as f64 >= self.0
    }
}

impl Default for PassThreshold {
    fn default() -> Self {
        Self(0.51)
    }
}

impl std::fmt::Display for PassThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}% yes required", self.0 * 100.0)
    }
}
