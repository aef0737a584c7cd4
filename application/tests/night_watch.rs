//! Night watch pass evaluation over the port fakes.

mod common;

use common::{FakeScheduler, FakeWorld, RecordingMessenger};
use nightpoll_application::ports::zone::Zone;
use nightpoll_application::{NightWatch, PollCommand, PollConfig, PollCoordinator};
use nightpoll_domain::{Ballot, ParticipantId, ZoneName};
use std::sync::Arc;
use tokio::sync::mpsc;

struct Harness {
    world: Arc<FakeWorld>,
    scheduler: Arc<FakeScheduler>,
    coordinator: PollCoordinator,
    watch: NightWatch,
    rx: mpsc::UnboundedReceiver<PollCommand>,
    // Keeps the command channel open for the weak timer sink
    _tx: mpsc::UnboundedSender<PollCommand>,
}

fn harness(config: PollConfig) -> Harness {
    let world = FakeWorld::new();
    let scheduler = FakeScheduler::new();
    let messenger = RecordingMessenger::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let coordinator = PollCoordinator::new(
        config.clone(),
        Arc::clone(&world) as _,
        Arc::clone(&scheduler) as _,
        messenger as _,
        tx.downgrade(),
    );
    let watch = NightWatch::new(config, Arc::clone(&world) as _);
    Harness {
        world,
        scheduler,
        coordinator,
        watch,
        rx,
        _tx: tx,
    }
}

impl Harness {
    fn pass(&mut self) {
        self.watch.run_pass(&mut self.coordinator);
    }

    fn finish_poll(&mut self) {
        self.scheduler.fire_one_shots();
        while let Ok(command) = self.rx.try_recv() {
            if let PollCommand::EndTimerFired { zone } = command {
                self.coordinator.handle_end_timer(&zone);
            }
        }
    }
}

fn watched_config(zones: &[&str]) -> PollConfig {
    PollConfig {
        min_participants_auto: 2,
        auto_zones: zones.iter().map(|z| ZoneName::new(*z)).collect(),
        ..PollConfig::default()
    }
}

const IN_WINDOW: i64 = 12_600;
const DAY: i64 = 1_000;

#[test]
fn auto_starts_when_night_approaches() {
    let mut h = harness(watched_config(&["overworld"]));
    let zone = h.world.add_zone("overworld", true);
    zone.set_clock(IN_WINDOW);
    h.world.join("a", "overworld");
    h.world.join("b", "overworld");

    h.pass();

    assert!(h.coordinator.is_active());
    assert_eq!(h.coordinator.active_zone(), Some(&ZoneName::new("overworld")));
    assert!(h.coordinator.cycle_attempted(&ZoneName::new("overworld")));
}

#[test]
fn nothing_starts_outside_the_window() {
    let mut h = harness(watched_config(&["overworld"]));
    let zone = h.world.add_zone("overworld", true);
    h.world.join("a", "overworld");
    h.world.join("b", "overworld");

    for tick in [0, 12_549, 13_550, 20_000] {
        zone.set_clock(tick);
        h.pass();
        assert!(!h.coordinator.is_active(), "tick {tick} must not trigger");
    }
}

#[test]
fn skipped_entirely_while_a_poll_is_active() {
    let mut h = harness(watched_config(&["overworld", "frontier"]));
    let overworld = h.world.add_zone("overworld", true);
    overworld.set_clock(IN_WINDOW);
    h.world.join("a", "overworld");
    h.world.join("b", "overworld");
    let frontier = h.world.add_zone("frontier", true);
    frontier.set_clock(IN_WINDOW);
    h.world.join("c", "frontier");
    h.world.join("d", "frontier");

    h.pass();
    assert_eq!(h.coordinator.active_zone(), Some(&ZoneName::new("overworld")));

    // Frontier stays untouched while overworld's poll runs
    h.pass();
    assert_eq!(h.coordinator.active_zone(), Some(&ZoneName::new("overworld")));
    assert!(!h.coordinator.cycle_attempted(&ZoneName::new("frontier")));
}

#[test]
fn one_attempt_per_cycle() {
    let mut h = harness(watched_config(&["overworld"]));
    let zone = h.world.add_zone("overworld", true);
    zone.set_clock(IN_WINDOW);
    h.world.join("a", "overworld");
    h.world.join("b", "overworld");

    h.pass();
    h.finish_poll(); // timeout, nobody voted, poll fails

    assert!(!h.coordinator.is_active());
    assert!(h.coordinator.cycle_attempted(&ZoneName::new("overworld")));

    // Still night: no second offer
    h.pass();
    assert!(!h.coordinator.is_active());
}

#[test]
fn daytime_opens_the_next_cycle() {
    let mut h = harness(watched_config(&["overworld"]));
    let zone = h.world.add_zone("overworld", true);
    zone.set_clock(IN_WINDOW);
    h.world.join("a", "overworld");
    h.world.join("b", "overworld");

    h.pass();
    h.finish_poll();
    assert!(h.coordinator.cycle_attempted(&ZoneName::new("overworld")));

    zone.set_clock(DAY);
    h.pass();
    assert!(!h.coordinator.cycle_attempted(&ZoneName::new("overworld")));

    // Next night triggers again
    zone.set_clock(IN_WINDOW);
    h.pass();
    assert!(h.coordinator.is_active());
}

#[test]
fn below_population_stays_retryable() {
    let mut h = harness(watched_config(&["overworld"]));
    let zone = h.world.add_zone("overworld", true);
    zone.set_clock(IN_WINDOW);
    h.world.join("a", "overworld");

    h.pass();
    assert!(!h.coordinator.is_active());
    assert!(!h.coordinator.cycle_attempted(&ZoneName::new("overworld")));

    // Population rises later the same night
    h.world.join("b", "overworld");
    h.pass();
    assert!(h.coordinator.is_active());
}

#[test]
fn first_qualifying_zone_wins_the_pass() {
    let mut h = harness(watched_config(&["overworld", "frontier"]));
    let overworld = h.world.add_zone("overworld", true);
    overworld.set_clock(IN_WINDOW);
    h.world.join("a", "overworld");
    h.world.join("b", "overworld");
    let frontier = h.world.add_zone("frontier", true);
    frontier.set_clock(IN_WINDOW);
    h.world.join("c", "frontier");
    h.world.join("d", "frontier");

    h.pass();
    assert_eq!(h.coordinator.active_zone(), Some(&ZoneName::new("overworld")));

    // Once overworld's cycle is spent, frontier gets its turn
    h.finish_poll();
    h.pass();
    assert_eq!(h.coordinator.active_zone(), Some(&ZoneName::new("frontier")));
}

#[test]
fn unknown_and_unvotable_zones_are_skipped() {
    let mut h = harness(watched_config(&["missing", "depths", "overworld"]));
    let depths = h.world.add_zone("depths", false);
    depths.set_clock(IN_WINDOW);
    h.world.join("x", "depths");
    h.world.join("y", "depths");
    let zone = h.world.add_zone("overworld", true);
    zone.set_clock(IN_WINDOW);
    h.world.join("a", "overworld");
    h.world.join("b", "overworld");

    h.pass();
    assert_eq!(h.coordinator.active_zone(), Some(&ZoneName::new("overworld")));
}

#[test]
fn policy_off_allows_repeat_attempts_same_night() {
    let config = PollConfig {
        once_per_cycle: false,
        ..watched_config(&["overworld"])
    };
    let mut h = harness(config);
    let zone = h.world.add_zone("overworld", true);
    zone.set_clock(IN_WINDOW);
    h.world.join("a", "overworld");
    h.world.join("b", "overworld");

    h.pass();
    // Fails: one yes, one no at 51%
    h.coordinator.cast_vote(&ParticipantId::new("a"), Ballot::Yes);
    h.coordinator.cast_vote(&ParticipantId::new("b"), Ballot::No);
    assert!(!h.coordinator.is_active());

    // With the policy off the same night offers another poll
    h.pass();
    assert!(h.coordinator.is_active());
}
