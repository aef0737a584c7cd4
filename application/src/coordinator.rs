//! Poll coordinator
//!
//! The single owner of all poll state. States run Idle → Active →
//! {Decided, Cancelled} → Idle; every terminal path returns to Idle, so
//! the system can never get stuck with no poll startable.
//!
//! All methods are synchronous and must be called from the serialized
//! command loop (see [`crate::service`]). The end-timer callback does not
//! touch state itself: it posts [`PollCommand::EndTimerFired`] back into
//! the loop, and the handler re-validates that the poll it belongs to is
//! still the active one.

use crate::config::PollConfig;
use crate::messages::{Placeholders, keys, rejection_message};
use crate::ports::directory::ParticipantDirectory;
use crate::ports::messenger::Messenger;
use crate::ports::scheduler::{Scheduler, TimerGuard};
use crate::ports::zone::{Zone, ZoneRef};
use crate::service::PollCommand;
use nightpoll_domain::{Ballot, CycleLedger, ParticipantId, Poll, PollRejection, Tally, ZoneName};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::WeakUnboundedSender;
use tracing::{debug, info, warn};

/// Who asked for a poll to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOrigin {
    /// Requested through the admin surface, optionally by a participant
    Manual { initiator: Option<ParticipantId> },
    /// Triggered by the night watch
    Automatic,
}

impl StartOrigin {
    /// Whether this is a manual start.
    pub fn is_manual(&self) -> bool {
        matches!(self, StartOrigin::Manual { .. })
    }

    fn initiator(&self) -> Option<&ParticipantId> {
        match self {
            StartOrigin::Manual { initiator } => initiator.as_ref(),
            StartOrigin::Automatic => None,
        }
    }
}

/// Read-only snapshot of the coordinator, for the admin surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollStatus {
    /// Zone of the active poll, `None` when idle
    pub zone: Option<ZoneName>,
    /// Remaining eligible voters
    pub eligible: usize,
    /// Recorded ballots
    pub votes: usize,
    /// Zones flagged as attempted this night cycle
    pub flagged_zones: usize,
}

impl PollStatus {
    /// Whether a poll is running.
    pub fn is_active(&self) -> bool {
        self.zone.is_some()
    }
}

/// The poll coordination state machine
pub struct PollCoordinator {
    config: PollConfig,
    directory: Arc<dyn ParticipantDirectory>,
    scheduler: Arc<dyn Scheduler>,
    messenger: Arc<dyn Messenger>,
    /// Re-entry point for timer callbacks into the serialized loop.
    /// Weak so the coordinator does not keep its own command channel open.
    sink: WeakUnboundedSender<PollCommand>,
    poll: Poll,
    /// Zone handle of the active poll; set and cleared with `poll`
    active_zone: Option<ZoneRef>,
    /// Pending timeout; cancelled on every terminal transition
    end_timer: Option<Box<dyn TimerGuard>>,
    cycles: CycleLedger,
}

impl PollCoordinator {
    pub fn new(
        config: PollConfig,
        directory: Arc<dyn ParticipantDirectory>,
        scheduler: Arc<dyn Scheduler>,
        messenger: Arc<dyn Messenger>,
        sink: WeakUnboundedSender<PollCommand>,
    ) -> Self {
        Self {
            config,
            directory,
            scheduler,
            messenger,
            sink,
            poll: Poll::new(),
            active_zone: None,
            end_timer: None,
            cycles: CycleLedger::new(),
        }
    }

    // ==================== Queries ====================

    /// Whether a poll is running anywhere.
    pub fn is_active(&self) -> bool {
        self.poll.is_active()
    }

    /// Zone of the active poll.
    pub fn active_zone(&self) -> Option<&ZoneName> {
        self.poll.zone()
    }

    /// Whether the participant has a recorded ballot in the active poll.
    pub fn has_voted(&self, participant: &ParticipantId) -> bool {
        self.poll.has_voted(participant)
    }

    /// Snapshot for the admin surface.
    pub fn status(&self) -> PollStatus {
        PollStatus {
            zone: self.poll.zone().cloned(),
            eligible: self.poll.eligible().len(),
            votes: self.poll.vote_count(),
            flagged_zones: self.cycles.len(),
        }
    }

    // ==================== Cycle ledger accessors ====================
    // The ledger is shared with the night watch, but only through these.

    /// Whether an automatic attempt is already recorded for `zone`.
    pub fn cycle_attempted(&self, zone: &ZoneName) -> bool {
        self.cycles.is_attempted(zone)
    }

    /// Record an attempt for `zone` if the once-per-cycle policy is on.
    pub fn mark_cycle_attempted(&mut self, zone: &ZoneName) {
        if self.config.once_per_cycle {
            self.cycles.mark(zone);
        }
    }

    /// Remove the attempt flag for `zone`. Idempotent.
    pub fn clear_cycle_attempt(&mut self, zone: &ZoneName) {
        if self.cycles.clear(zone) {
            debug!(%zone, "attempt cycle cleared");
        }
    }

    /// Admin reset of one zone's attempt flag.
    pub fn reset_attempt_cycle(&mut self, zone: &ZoneName) {
        self.cycles.clear(zone);
        info!(%zone, "attempt cycle reset");
    }

    /// Admin reset of every zone's attempt flag.
    pub fn reset_all_attempt_cycles(&mut self) {
        self.cycles.clear_all();
        info!("all attempt cycles reset");
    }

    // ==================== Lifecycle ====================

    /// Try to start a poll in `zone`. Returns whether it started.
    ///
    /// Failures are surfaced to a manual initiator as targeted
    /// notifications; automatic failures are only logged. A below-minimum
    /// failure clears the zone's attempt flag so a later pass can retry
    /// once the population rises.
    pub fn start(&mut self, zone: ZoneRef, origin: StartOrigin) -> bool {
        let name = zone.name();

        if let Some(active) = self.poll.zone() {
            self.refuse(
                &origin,
                PollRejection::AlreadyActive {
                    zone: active.clone(),
                },
            );
            return false;
        }

        if !zone.is_votable() {
            self.refuse(&origin, PollRejection::ZoneNotVotable { zone: name });
            return false;
        }

        let participants = zone.participants();
        let need = self.config.min_participants(origin.is_manual());
        if participants.len() < need {
            self.refuse(
                &origin,
                PollRejection::NotEnoughParticipants {
                    zone: name.clone(),
                    have: participants.len(),
                    need,
                },
            );
            // Leave the zone eligible for a retry once population rises
            self.clear_cycle_attempt(&name);
            return false;
        }

        let eligible = participants.len();
        self.poll.open(name.clone(), participants);
        self.active_zone = Some(Arc::clone(&zone));
        self.mark_cycle_attempted(&name);

        let placeholders = Placeholders::new()
            .with("zone", &name)
            .with("duration", self.config.duration_secs);
        let start_key = match &origin {
            StartOrigin::Manual {
                initiator: Some(by),
            } => {
                let ph = placeholders.clone().with("initiator", by);
                self.messenger
                    .broadcast(zone.as_ref(), keys::POLL_STARTED_MANUAL, &ph);
                keys::POLL_STARTED_MANUAL
            }
            _ => {
                self.messenger
                    .broadcast(zone.as_ref(), keys::POLL_STARTED, &placeholders);
                keys::POLL_STARTED
            }
        };
        self.messenger
            .broadcast(zone.as_ref(), keys::POLL_INSTRUCTIONS, &placeholders);

        // The callback only posts back into the loop; the handler checks
        // the poll is still this zone's before acting, so a timer that
        // outlives its poll is harmless.
        let sink = self.sink.clone();
        let timer_zone = name.clone();
        self.end_timer = Some(self.scheduler.after(
            self.config.duration(),
            Box::new(move || {
                if let Some(sink) = sink.upgrade() {
                    let _ = sink.send(PollCommand::EndTimerFired { zone: timer_zone });
                }
            }),
        ));

        info!(zone = %name, eligible, manual = origin.is_manual(), key = start_key, "poll started");
        true
    }

    /// Handle the end-timer firing: decide the poll unless the timer is
    /// stale (poll gone, or a different zone's poll is active).
    pub fn handle_end_timer(&mut self, zone: &ZoneName) {
        if self.poll.zone() == Some(zone) {
            debug!(%zone, "poll duration elapsed");
            self.end();
        } else {
            debug!(%zone, "stale end timer ignored");
        }
    }

    /// Record a participant's ballot.
    ///
    /// Every precondition failure is answered with a targeted
    /// notification and leaves the poll untouched. When the last
    /// currently-present eligible voter casts a ballot the poll is
    /// decided immediately instead of waiting for the timeout.
    pub fn cast_vote(&mut self, participant: &ParticipantId, ballot: Ballot) {
        let Some(zone) = self.active_zone.clone() else {
            self.notify_rejection(participant, &PollRejection::NoActivePoll);
            return;
        };
        let zone_name = zone.name();

        if !self.is_present(participant, &zone_name) {
            self.notify_rejection(participant, &PollRejection::NotInPollZone { zone: zone_name });
            return;
        }
        if !self.poll.is_eligible(participant) {
            self.notify_rejection(participant, &PollRejection::NotEligible);
            return;
        }
        if self.poll.has_voted(participant) {
            self.notify_rejection(participant, &PollRejection::AlreadyVoted);
            return;
        }

        self.poll.record_vote(participant, ballot);
        debug!(%participant, %ballot, zone = %zone_name, "ballot recorded");

        let placeholders = Placeholders::new()
            .with("participant", participant)
            .with("ballot", ballot);
        self.messenger
            .broadcast(zone.as_ref(), keys::PARTICIPANT_VOTED, &placeholders);

        // Early completion is decided against who is eligible *now*, not
        // the snapshot: departed voters must not hold the poll open.
        let present = self.present_eligible();
        if !present.is_empty() && present.iter().all(|id| self.poll.has_voted(id)) {
            info!(zone = %zone_name, "all present eligible voters have voted");
            self.end();
        }
    }

    /// A participant left the zone they were in (quit or transfer away).
    ///
    /// `zone_at_event` is where they were when the event fired; anything
    /// else is re-validated against the directory here.
    pub fn leave(&mut self, participant: &ParticipantId, zone_at_event: &ZoneName) {
        if self.poll.zone() != Some(zone_at_event) {
            return;
        }
        let Some(zone) = self.active_zone.clone() else {
            return;
        };

        let withdrawal = self.poll.remove_participant(participant);
        if withdrawal.had_voted {
            let placeholders = Placeholders::new()
                .with("participant", participant)
                .with("zone", zone_at_event);
            self.messenger
                .broadcast(zone.as_ref(), keys::VOTE_WITHDRAWN, &placeholders);
        }

        if !withdrawal.was_eligible {
            return;
        }

        let still_present = self.present_eligible();
        if still_present.is_empty() {
            info!(zone = %zone_at_event, "every eligible voter left the zone");
            self.cancel(
                keys::ALL_ELIGIBLE_LEFT,
                Placeholders::new().with("zone", zone_at_event),
                true,
            );
        } else if still_present.iter().all(|id| self.poll.has_voted(id)) {
            self.end();
        }
    }

    /// A participant moved from `from` to another zone.
    ///
    /// Leaving the poll's zone counts exactly like quitting; entering it
    /// never grants eligibility.
    pub fn zone_change(&mut self, participant: &ParticipantId, from: &ZoneName) {
        if self.poll.zone() == Some(from) {
            self.leave(participant, from);
        }
    }

    /// A participant appeared in `zone` (connected or transferred in).
    ///
    /// Tells them about a poll already running there; their eligibility
    /// is whatever it already was.
    pub fn zone_entered(&mut self, participant: &ParticipantId, zone: &ZoneName) {
        if self.poll.zone() != Some(zone) {
            return;
        }
        let placeholders = Placeholders::new()
            .with("zone", zone)
            .with("duration", self.config.duration_secs);
        self.messenger
            .notify(participant, keys::POLL_IN_PROGRESS, &placeholders);
        self.messenger
            .notify(participant, keys::POLL_INSTRUCTIONS, &placeholders);
    }

    /// Cancel the active poll, broadcasting `reason_key`. No-op when idle.
    ///
    /// With `keep_cycle` the attempt stays recorded as this cycle's
    /// outcome; without it the zone's flag is cleared so a later attempt
    /// is not suppressed.
    pub fn cancel(&mut self, reason_key: &str, placeholders: Placeholders, keep_cycle: bool) {
        let Some(zone) = self.active_zone.clone() else {
            return;
        };
        let name = zone.name();

        self.clear_end_timer();
        self.messenger
            .broadcast(zone.as_ref(), reason_key, &placeholders);
        self.reset_to_idle();

        if keep_cycle {
            self.mark_cycle_attempted(&name);
        } else {
            self.clear_cycle_attempt(&name);
        }
        info!(zone = %name, reason = reason_key, keep_cycle, "poll cancelled");
    }

    /// Host is going down: cancel a running poll but keep the cycle flag,
    /// so a reload within the same night does not re-offer a poll.
    pub fn shutdown(&mut self) {
        if let Some(zone) = self.poll.zone().cloned() {
            warn!(%zone, "shutting down with an active poll");
            self.cancel(
                keys::POLL_CANCELLED_SHUTDOWN,
                Placeholders::new().with("zone", &zone),
                true,
            );
        }
    }

    // ==================== Decision ====================

    /// Decide the poll: tally the final eligible set, announce, and on a
    /// pass advance the zone clock to day start.
    fn end(&mut self) {
        let Some(zone) = self.active_zone.clone() else {
            return;
        };
        let name = zone.name();

        self.clear_end_timer();

        // Who is eligible at the end is what counts: voters who left keep
        // no say, even if their ballot was cast earlier.
        let final_eligible = self.present_eligible();
        let tally = Tally::count(
            self.poll.ballots_of(&final_eligible),
            final_eligible.len(),
            self.config.threshold(),
        );

        let placeholders = Placeholders::new()
            .with("yes", tally.yes_votes)
            .with("no", tally.no_votes)
            .with("eligible", tally.eligible)
            .with("zone", &name);
        self.messenger
            .broadcast(zone.as_ref(), keys::POLL_RESULTS, &placeholders);

        if tally.passed {
            self.messenger
                .broadcast(zone.as_ref(), keys::POLL_PASSED, &placeholders);
            if zone.is_votable() {
                zone.set_clock(self.config.day_start_tick);
            } else {
                // Still finalizes to idle; the constraint only costs the
                // clock change.
                let (key, ph) =
                    rejection_message(&PollRejection::ClockUnchangeable { zone: name.clone() });
                self.messenger.broadcast(zone.as_ref(), key, &ph);
            }
        } else {
            self.messenger
                .broadcast(zone.as_ref(), keys::POLL_FAILED, &placeholders);
        }

        info!(zone = %name, %tally, "poll decided");
        self.reset_to_idle();
        self.mark_cycle_attempted(&name);
    }

    // ==================== Helpers ====================

    /// Eligible voters who are online and inside the poll's zone right now.
    fn present_eligible(&self) -> HashSet<ParticipantId> {
        let Some(zone) = self.poll.zone() else {
            return HashSet::new();
        };
        self.poll
            .eligible()
            .iter()
            .filter(|id| self.directory.is_online(id) && self.is_present(id, zone))
            .cloned()
            .collect()
    }

    fn is_present(&self, participant: &ParticipantId, zone: &ZoneName) -> bool {
        self.directory
            .current_zone(participant)
            .is_some_and(|z| z.name() == *zone)
    }

    fn clear_end_timer(&mut self) {
        if let Some(timer) = self.end_timer.take() {
            timer.cancel();
        }
    }

    fn reset_to_idle(&mut self) {
        self.poll.close();
        self.active_zone = None;
    }

    fn notify_rejection(&self, participant: &ParticipantId, rejection: &PollRejection) {
        debug!(%participant, %rejection, "operation rejected");
        let (key, placeholders) = rejection_message(rejection);
        self.messenger.notify(participant, key, &placeholders);
    }

    /// Surface a start failure: manual initiators get a notification,
    /// automatic attempts only a log line.
    fn refuse(&self, origin: &StartOrigin, rejection: PollRejection) {
        match origin.initiator() {
            Some(initiator) => self.notify_rejection(initiator, &rejection),
            None => debug!(%rejection, manual = origin.is_manual(), "start refused"),
        }
    }
}
