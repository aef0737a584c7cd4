//! Tally of a finished poll
//!
//! Aggregates the ballots of the final eligible set into counts and a
//! pass/fail outcome.

use super::ballot::Ballot;
use super::rule::PassThreshold;
use serde::{Deserialize, Serialize};

/// Result of counting a poll's ballots against its pass rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// Whether the poll passed
    pub passed: bool,
    /// Number of yes ballots among the final eligible set
    pub yes_votes: usize,
    /// Number of no ballots among the final eligible set
    pub no_votes: usize,
    /// Size of the final eligible set
    pub eligible: usize,
}

impl Tally {
    /// Count ballots and apply the pass rule.
    ///
    /// `ballots` must already be restricted to the final eligible set;
    /// `eligible` is that set's size (abstainers count against the yes
    /// share).
    pub fn count<'a, I>(ballots: I, eligible: usize, rule: PassThreshold) -> Self
    where
        I: IntoIterator<Item = &'a Ballot>,
    {
        let mut yes_votes = 0;
        let mut no_votes = 0;
        for ballot in ballots {
            if ballot.is_yes() {
                yes_votes += 1;
            } else {
                no_votes += 1;
            }
        }

        Self {
            passed: rule.is_met(yes_votes, eligible),
            yes_votes,
            no_votes,
            eligible,
        }
    }

    /// Share of yes votes among the final eligible set (0.0 to 1.0).
    pub fn yes_ratio(&self) -> f64 {
        if self.eligible == 0 {
            0.0
        } else {
            self.yes_votes as f64 / self.eligible as f64
        }
    }

    /// Whether every final-eligible participant cast a ballot.
    pub fn is_complete(&self) -> bool {
        self.yes_votes + self.no_votes >= self.eligible
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} yes / {} no of {} eligible ({})",
            self.yes_votes,
            self.no_votes,
            self.eligible,
            if self.passed { "passed" } else { "failed" }
        )
    }
}
