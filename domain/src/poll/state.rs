//! The singleton poll state
//!
//! [`Poll`] carries the mutable heart of a running poll: the zone it
//! belongs to, the snapshot electorate, and the ballots cast so far. It is
//! exclusively owned by the coordinator; nothing else reads or writes it.
//!
//! Invariants maintained by every mutation:
//! - `zone` is `Some` exactly while the poll is active,
//! - the eligible set only shrinks after [`Poll::open`],
//! - every ballot belongs to a currently eligible participant.

use super::ballot::Ballot;
use crate::ids::{ParticipantId, ZoneName};
use std::collections::{HashMap, HashSet};

/// Outcome of removing a participant from an active poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    /// The participant was in the eligible set
    pub was_eligible: bool,
    /// The participant had a recorded ballot (now discarded)
    pub had_voted: bool,
}

/// State of the single global poll
#[derive(Debug, Default)]
pub struct Poll {
    zone: Option<ZoneName>,
    eligible: HashSet<ParticipantId>,
    votes: HashMap<ParticipantId, Ballot>,
}

impl Poll {
    /// Create an idle poll.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Queries ====================

    /// Whether a poll is currently running.
    pub fn is_active(&self) -> bool {
        self.zone.is_some()
    }

    /// Zone of the active poll, `None` when idle.
    pub fn zone(&self) -> Option<&ZoneName> {
        self.zone.as_ref()
    }

    /// The remaining eligible voters.
    pub fn eligible(&self) -> &HashSet<ParticipantId> {
        &self.eligible
    }

    /// Whether the participant is still in the eligible set.
    pub fn is_eligible(&self, participant: &ParticipantId) -> bool {
        self.eligible.contains(participant)
    }

    /// Whether the participant has a recorded ballot.
    pub fn has_voted(&self, participant: &ParticipantId) -> bool {
        self.votes.contains_key(participant)
    }

    /// Number of recorded ballots.
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// Ballots of the given subset of participants, for tallying.
    pub fn ballots_of<'a>(
        &'a self,
        subset: &'a HashSet<ParticipantId>,
    ) -> impl Iterator<Item = &'a Ballot> {
        self.votes
            .iter()
            .filter(|(id, _)| subset.contains(*id))
            .map(|(_, ballot)| ballot)
    }

    // ==================== Transitions ====================

    /// Open a poll in `zone` with the given snapshot electorate.
    ///
    /// Any previous state is discarded; the ballot box starts empty.
    pub fn open(&mut self, zone: ZoneName, voters: impl IntoIterator<Item = ParticipantId>) {
        self.zone = Some(zone);
        self.eligible = voters.into_iter().collect();
        self.votes.clear();
    }

    /// Reset to idle, dropping electorate and ballots.
    pub fn close(&mut self) {
        self.zone = None;
        self.eligible.clear();
        self.votes.clear();
    }

    /// Record a ballot for an eligible participant.
    ///
    /// Returns false (and records nothing) if the participant is not
    /// eligible or has already voted; the caller decides how to surface
    /// that.
    pub fn record_vote(&mut self, participant: &ParticipantId, ballot: Ballot) -> bool {
        if !self.eligible.contains(participant) || self.votes.contains_key(participant) {
            return false;
        }
        self.votes.insert(participant.clone(), ballot);
        true
    }

    /// Remove a participant from the electorate and discard their ballot.
    pub fn remove_participant(&mut self, participant: &ParticipantId) -> Withdrawal {
        Withdrawal {
            was_eligible: self.eligible.remove(participant),
            had_voted: self.votes.remove(participant).is_some(),
        }
    }
}
