//! Simulated zone

use nightpoll_application::ports::zone::Zone;
use nightpoll_domain::{ParticipantId, ZoneName};
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// A zone backed by in-process state
pub struct SimZone {
    name: ZoneName,
    votable: AtomicBool,
    clock: AtomicI64,
    members: Mutex<BTreeSet<ParticipantId>>,
}

impl SimZone {
    pub fn new(name: impl Into<ZoneName>, votable: bool) -> Self {
        Self {
            name: name.into(),
            votable: AtomicBool::new(votable),
            clock: AtomicI64::new(0),
            members: Mutex::new(BTreeSet::new()),
        }
    }

    /// Advance the clock by `ticks`, wrapping at the day length.
    pub fn advance_clock(&self, ticks: i64) -> i64 {
        let day_length = 24_000;
        let mut current = self.clock.load(Ordering::SeqCst);
        current = (current + ticks).rem_euclid(day_length);
        self.clock.store(current, Ordering::SeqCst);
        current
    }

    pub(crate) fn insert_member(&self, participant: ParticipantId) {
        self.members.lock().unwrap().insert(participant);
    }

    pub(crate) fn remove_member(&self, participant: &ParticipantId) -> bool {
        self.members.lock().unwrap().remove(participant)
    }

    pub(crate) fn has_member(&self, participant: &ParticipantId) -> bool {
        self.members.lock().unwrap().contains(participant)
    }
}

impl Zone for SimZone {
    fn name(&self) -> ZoneName {
        self.name.clone()
    }

    fn participants(&self) -> Vec<ParticipantId> {
        self.members.lock().unwrap().iter().cloned().collect()
    }

    fn clock(&self) -> i64 {
        self.clock.load(Ordering::SeqCst)
    }

    fn set_clock(&self, tick: i64) {
        self.clock.store(tick, Ordering::SeqCst);
    }

    fn is_votable(&self) -> bool {
        self.votable.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_wraps_at_day_length() {
        let zone = SimZone::new("overworld", true);
        zone.set_clock(23_500);
        assert_eq!(zone.advance_clock(1_000), 500);
        assert_eq!(zone.clock(), 500);
    }

    #[test]
    fn test_membership() {
        let zone = SimZone::new("overworld", true);
        zone.insert_member(ParticipantId::new("alice"));
        assert!(zone.has_member(&ParticipantId::new("alice")));
        assert_eq!(zone.participants().len(), 1);
        assert!(zone.remove_member(&ParticipantId::new("alice")));
        assert!(zone.participants().is_empty());
    }
}
