//! In-process fakes for the port contracts, shared by the integration
//! tests. They mirror the shapes of the real adapters but keep everything
//! synchronous and inspectable.

#![allow(dead_code)]

use nightpoll_application::messages::Placeholders;
use nightpoll_application::ports::directory::ParticipantDirectory;
use nightpoll_application::ports::messenger::Messenger;
use nightpoll_application::ports::scheduler::{Scheduler, TimerGuard};
use nightpoll_application::ports::zone::{Zone, ZoneRef, ZoneRegistry};
use nightpoll_domain::{ParticipantId, ZoneName};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==================== Zones and directory ====================

/// A zone whose membership lives in plain shared state
pub struct FakeZone {
    name: ZoneName,
    votable: AtomicBool,
    clock: AtomicI64,
    members: Mutex<BTreeSet<ParticipantId>>,
}

impl FakeZone {
    pub fn set_votable(&self, votable: bool) {
        self.votable.store(votable, Ordering::SeqCst);
    }
}

impl Zone for FakeZone {
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

/// Registry + directory over a set of [`FakeZone`]s
#[derive(Default)]
pub struct FakeWorld {
    zones: Mutex<BTreeMap<ZoneName, Arc<FakeZone>>>,
    online: Mutex<BTreeSet<ParticipantId>>,
}

impl FakeWorld {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_zone(&self, name: &str, votable: bool) -> Arc<FakeZone> {
        let zone = Arc::new(FakeZone {
            name: ZoneName::new(name),
            votable: AtomicBool::new(votable),
            clock: AtomicI64::new(0),
            members: Mutex::new(BTreeSet::new()),
        });
        self.zones
            .lock()
            .unwrap()
            .insert(ZoneName::new(name), Arc::clone(&zone));
        zone
    }

    /// Bring a participant online inside `zone`.
    pub fn join(&self, participant: &str, zone: &str) {
        let id = ParticipantId::new(participant);
        self.online.lock().unwrap().insert(id.clone());
        self.zone_named(zone).members.lock().unwrap().insert(id);
    }

    /// Disconnect a participant; returns the zone they were in.
    pub fn quit(&self, participant: &str) -> ZoneName {
        let id = ParticipantId::new(participant);
        self.online.lock().unwrap().remove(&id);
        let from = self.locate(&id).expect("participant was nowhere");
        self.zone_named(from.as_str())
            .members
            .lock()
            .unwrap()
            .remove(&id);
        from
    }

    /// Move a participant between zones; returns the zone they left.
    pub fn transfer(&self, participant: &str, to: &str) -> ZoneName {
        let id = ParticipantId::new(participant);
        let from = self.locate(&id).expect("participant was nowhere");
        self.zone_named(from.as_str())
            .members
            .lock()
            .unwrap()
            .remove(&id);
        self.zone_named(to).members.lock().unwrap().insert(id);
        from
    }

    fn zone_named(&self, name: &str) -> Arc<FakeZone> {
        Arc::clone(
            self.zones
                .lock()
                .unwrap()
                .get(&ZoneName::new(name))
                .expect("unknown zone"),
        )
    }

    fn locate(&self, participant: &ParticipantId) -> Option<ZoneName> {
        self.zones
            .lock()
            .unwrap()
            .values()
            .find(|z| z.members.lock().unwrap().contains(participant))
            .map(|z| z.name())
    }
}

impl ZoneRegistry for FakeWorld {
    fn zone(&self, name: &ZoneName) -> Option<ZoneRef> {
        self.zones
            .lock()
            .unwrap()
            .get(name)
            .map(|z| Arc::clone(z) as ZoneRef)
    }

    fn zones(&self) -> Vec<ZoneRef> {
        self.zones
            .lock()
            .unwrap()
            .values()
            .map(|z| Arc::clone(z) as ZoneRef)
            .collect()
    }
}

impl ParticipantDirectory for FakeWorld {
    fn is_online(&self, participant: &ParticipantId) -> bool {
        self.online.lock().unwrap().contains(participant)
    }

    fn current_zone(&self, participant: &ParticipantId) -> Option<ZoneRef> {
        if !self.is_online(participant) {
            return None;
        }
        let name = self.locate(participant)?;
        self.zone(&name)
    }
}

// ==================== Scheduler ====================

struct FakeTimer {
    delay: Duration,
    one_shot: Option<Box<dyn FnOnce() + Send>>,
    periodic: Option<Box<dyn Fn() + Send>>,
    cancelled: Arc<AtomicBool>,
}

/// Scheduler whose timers fire only when the test says so
#[derive(Default)]
pub struct FakeScheduler {
    timers: Mutex<Vec<FakeTimer>>,
}

pub struct FakeGuard(Arc<AtomicBool>);

impl TimerGuard for FakeGuard {
    fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Scheduler for FakeScheduler {
    fn after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> Box<dyn TimerGuard> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.timers.lock().unwrap().push(FakeTimer {
            delay,
            one_shot: Some(callback),
            periodic: None,
            cancelled: Arc::clone(&cancelled),
        });
        Box::new(FakeGuard(cancelled))
    }

    fn every(&self, period: Duration, callback: Box<dyn Fn() + Send>) -> Box<dyn TimerGuard> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.timers.lock().unwrap().push(FakeTimer {
            delay: period,
            one_shot: None,
            periodic: Some(callback),
            cancelled: Arc::clone(&cancelled),
        });
        Box::new(FakeGuard(cancelled))
    }
}

impl FakeScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fire every pending, uncancelled one-shot timer.
    pub fn fire_one_shots(&self) {
        let mut timers = self.timers.lock().unwrap();
        let fired: Vec<_> = timers
            .iter_mut()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .filter_map(|t| t.one_shot.take())
            .collect();
        drop(timers);
        for callback in fired {
            callback();
        }
    }

    /// Fire every registered, uncancelled periodic timer once.
    ///
    /// Invoked under the lock; callbacks only post into a channel and
    /// never re-enter the scheduler.
    pub fn fire_periodic(&self) {
        let timers = self.timers.lock().unwrap();
        for timer in timers.iter() {
            if timer.cancelled.load(Ordering::SeqCst) {
                continue;
            }
            if let Some(callback) = &timer.periodic {
                callback();
            }
        }
    }

    /// Pending (unfired, uncancelled) one-shot timers.
    pub fn pending_one_shots(&self) -> usize {
        self.timers
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.one_shot.is_some() && !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    pub fn last_delay(&self) -> Option<Duration> {
        self.timers.lock().unwrap().last().map(|t| t.delay)
    }
}

// ==================== Messenger ====================

/// Where a recorded message was delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Notify(ParticipantId),
    Broadcast(ZoneName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub target: Target,
    pub key: String,
    pub placeholders: Placeholders,
}

/// Messenger that records every delivery for assertions
#[derive(Default)]
pub struct RecordingMessenger {
    deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Keys broadcast to `zone`, in order.
    pub fn broadcast_keys(&self, zone: &str) -> Vec<String> {
        self.deliveries()
            .into_iter()
            .filter(|d| d.target == Target::Broadcast(ZoneName::new(zone)))
            .map(|d| d.key)
            .collect()
    }

    /// Keys notified to `participant`, in order.
    pub fn notify_keys(&self, participant: &str) -> Vec<String> {
        self.deliveries()
            .into_iter()
            .filter(|d| d.target == Target::Notify(ParticipantId::new(participant)))
            .map(|d| d.key)
            .collect()
    }

    /// Last delivery with the given key, if any.
    pub fn last_with_key(&self, key: &str) -> Option<Delivery> {
        self.deliveries().into_iter().rev().find(|d| d.key == key)
    }

    pub fn clear(&self) {
        self.deliveries.lock().unwrap().clear();
    }
}

impl Messenger for RecordingMessenger {
    fn notify(&self, participant: &ParticipantId, key: &str, placeholders: &Placeholders) {
        self.deliveries.lock().unwrap().push(Delivery {
            target: Target::Notify(participant.clone()),
            key: key.to_string(),
            placeholders: placeholders.clone(),
        });
    }

    fn broadcast(&self, zone: &dyn Zone, key: &str, placeholders: &Placeholders) {
        self.deliveries.lock().unwrap().push(Delivery {
            target: Target::Broadcast(zone.name()),
            key: key.to_string(),
            placeholders: placeholders.clone(),
        });
    }
}
