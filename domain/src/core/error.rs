//! Domain error types

use crate::ids::ZoneName;
use thiserror::Error;

/// Reasons the coordinator rejects an operation.
///
/// Every variant is recoverable: it is surfaced to the caller as a
/// targeted notification and the coordinator state is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollRejection {
    #[error("a poll is already active in {zone}")]
    AlreadyActive { zone: ZoneName },

    #[error("polls cannot be held in {zone}")]
    ZoneNotVotable { zone: ZoneName },

    #[error("{zone} has {have} participants, {need} required")]
    NotEnoughParticipants {
        zone: ZoneName,
        have: usize,
        need: usize,
    },

    #[error("no poll is active")]
    NoActivePoll,

    #[error("you are not in {zone}, where the poll is running")]
    NotInPollZone { zone: ZoneName },

    #[error("you are not eligible to vote in this poll")]
    NotEligible,

    #[error("you have already voted")]
    AlreadyVoted,

    #[error("the clock of {zone} cannot be changed")]
    ClockUnchangeable { zone: ZoneName },
}

impl PollRejection {
    /// Check if this rejection is the global mutual-exclusion conflict
    pub fn is_state_conflict(&self) -> bool {
        matches!(self, PollRejection::AlreadyActive { .. })
    }
}
