//! Participant directory port
//!
//! Answers the two questions the coordinator keeps re-asking while a poll
//! runs: is this participant still online, and where are they now. The
//! coordinator re-validates through this port at execution time rather
//! than trusting event payloads (state may have changed between dispatch
//! and handling).

use super::zone::ZoneRef;
use nightpoll_domain::ParticipantId;

/// Whereabouts of participants
pub trait ParticipantDirectory: Send + Sync {
    /// Whether the participant is currently connected.
    fn is_online(&self, participant: &ParticipantId) -> bool;

    /// The zone the participant is currently in, `None` if offline.
    fn current_zone(&self, participant: &ParticipantId) -> Option<ZoneRef>;
}
