//! Simulated world: zone registry plus participant directory
//!
//! Membership mutations report the zone a participant came from, so the
//! caller can dispatch the matching membership event into the poll
//! service, the same shape a real host's event hooks would have.

use super::zone::SimZone;
use nightpoll_application::ports::directory::ParticipantDirectory;
use nightpoll_application::ports::zone::{Zone, ZoneRef, ZoneRegistry};
use nightpoll_domain::{ParticipantId, ZoneName};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// In-memory registry of zones and whereabouts of participants
#[derive(Default)]
pub struct SimWorld {
    zones: RwLock<BTreeMap<ZoneName, Arc<SimZone>>>,
    online: RwLock<BTreeSet<ParticipantId>>,
}

impl SimWorld {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create and register a zone.
    pub fn add_zone(&self, name: impl Into<ZoneName>, votable: bool) -> Arc<SimZone> {
        let zone = Arc::new(SimZone::new(name, votable));
        self.zones
            .write()
            .unwrap()
            .insert(zone.name(), Arc::clone(&zone));
        zone
    }

    /// Look up the concrete zone handle.
    pub fn sim_zone(&self, name: &ZoneName) -> Option<Arc<SimZone>> {
        self.zones.read().unwrap().get(name).cloned()
    }

    /// Bring a participant online inside `zone`. Fails on unknown zones
    /// and on participants who are already somewhere.
    pub fn join(&self, participant: &ParticipantId, zone: &ZoneName) -> bool {
        if self.locate(participant).is_some() {
            return false;
        }
        let Some(target) = self.sim_zone(zone) else {
            return false;
        };
        self.online.write().unwrap().insert(participant.clone());
        target.insert_member(participant.clone());
        debug!(%participant, %zone, "joined");
        true
    }

    /// Disconnect a participant; returns the zone they were in.
    pub fn quit(&self, participant: &ParticipantId) -> Option<ZoneName> {
        self.online.write().unwrap().remove(participant);
        let from = self.locate(participant)?;
        if let Some(zone) = self.sim_zone(&from) {
            zone.remove_member(participant);
        }
        debug!(%participant, zone = %from, "quit");
        Some(from)
    }

    /// Move a participant into `to`; returns the zone they left.
    pub fn transfer(&self, participant: &ParticipantId, to: &ZoneName) -> Option<ZoneName> {
        let target = self.sim_zone(to)?;
        let from = self.locate(participant)?;
        if from == *to {
            return None;
        }
        if let Some(zone) = self.sim_zone(&from) {
            zone.remove_member(participant);
        }
        target.insert_member(participant.clone());
        debug!(%participant, from = %from, to = %to, "transferred");
        Some(from)
    }

    /// Participants currently online, in name order.
    pub fn online(&self) -> Vec<ParticipantId> {
        self.online.read().unwrap().iter().cloned().collect()
    }

    fn locate(&self, participant: &ParticipantId) -> Option<ZoneName> {
        self.zones
            .read()
            .unwrap()
            .values()
            .find(|zone| zone.has_member(participant))
            .map(|zone| zone.name())
    }
}

impl ZoneRegistry for SimWorld {
    fn zone(&self, name: &ZoneName) -> Option<ZoneRef> {
        self.sim_zone(name).map(|zone| zone as ZoneRef)
    }

    fn zones(&self) -> Vec<ZoneRef> {
        self.zones
            .read()
            .unwrap()
            .values()
            .map(|zone| Arc::clone(zone) as ZoneRef)
            .collect()
    }
}

impl ParticipantDirectory for SimWorld {
    fn is_online(&self, participant: &ParticipantId) -> bool {
        self.online.read().unwrap().contains(participant)
    }

    fn current_zone(&self, participant: &ParticipantId) -> Option<ZoneRef> {
        if !self.is_online(participant) {
            return None;
        }
        let name = self.locate(participant)?;
        self.zone(&name)
    }
}
