//! Serialized poll command loop
//!
//! All poll and cycle-ledger mutations happen on one task that owns the
//! [`PollCoordinator`] and the [`NightWatch`]. Event sources (chat,
//! membership churn, the admin surface, timer callbacks) reach it only
//! by posting a [`PollCommand`] through a [`PollHandle`]; nothing mutates
//! state from a concurrent callback. Commands are processed strictly in
//! dispatch order, and each handler re-validates state on arrival.

use crate::config::PollConfig;
use crate::coordinator::{PollCoordinator, PollStatus, StartOrigin};
use crate::messages::{Placeholders, keys, rejection_message};
use crate::ports::directory::ParticipantDirectory;
use crate::ports::messenger::Messenger;
use crate::ports::scheduler::Scheduler;
use crate::ports::zone::ZoneRegistry;
use crate::watch::NightWatch;
use nightpoll_domain::{Ballot, ParticipantId, PollRejection, ZoneName};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// A unit of work for the serialized loop
#[derive(Debug)]
pub enum PollCommand {
    /// Manually start a poll in the named zone
    Start {
        zone: ZoneName,
        initiator: Option<ParticipantId>,
        reply: Option<oneshot::Sender<bool>>,
    },
    /// Administratively cancel the active poll (opens the cycle again)
    Cancel {
        initiator: Option<ParticipantId>,
        reply: Option<oneshot::Sender<bool>>,
    },
    /// A participant cast a ballot
    CastVote {
        participant: ParticipantId,
        ballot: Ballot,
    },
    /// A participant disconnected; `zone` is where they were
    Leave {
        participant: ParticipantId,
        zone: ZoneName,
    },
    /// A participant moved zones; `from` is where they came from
    ZoneChange {
        participant: ParticipantId,
        from: ZoneName,
    },
    /// A participant connected or arrived in `zone`
    ZoneEntered {
        participant: ParticipantId,
        zone: ZoneName,
    },
    /// The active poll's end timer elapsed
    EndTimerFired { zone: ZoneName },
    /// Night watch cadence tick
    WatchTick,
    /// Admin: clear one zone's attempt flag, or all of them
    ResetCycle { zone: Option<ZoneName> },
    /// Admin: configuration reload; clears all attempt flags
    Reload,
    /// Snapshot the coordinator state
    Status { reply: oneshot::Sender<PollStatus> },
    /// Stop the loop, cancelling any active poll
    Shutdown { reply: Option<oneshot::Sender<()>> },
}

/// Spawns and owns the serialized command loop
pub struct PollService;

impl PollService {
    /// Spawn the loop and return the handle event sources use to reach it.
    ///
    /// The night watch cadence starts immediately; the loop runs until
    /// [`PollHandle::shutdown`] or until every handle is dropped.
    pub fn spawn(
        config: PollConfig,
        zones: Arc<dyn ZoneRegistry>,
        directory: Arc<dyn ParticipantDirectory>,
        scheduler: Arc<dyn Scheduler>,
        messenger: Arc<dyn Messenger>,
    ) -> PollHandle {
        let (tx, mut rx) = mpsc::unbounded_channel();

        // Internal senders are weak: only external handles keep the loop
        // alive, so dropping every handle shuts the service down.
        let mut coordinator = PollCoordinator::new(
            config.clone(),
            directory,
            Arc::clone(&scheduler),
            Arc::clone(&messenger),
            tx.downgrade(),
        );
        let watch = NightWatch::new(config.clone(), Arc::clone(&zones));

        let tick_sink = tx.downgrade();
        let tick_guard = scheduler.every(
            config.check_interval(),
            Box::new(move || {
                if let Some(sink) = tick_sink.upgrade() {
                    let _ = sink.send(PollCommand::WatchTick);
                }
            }),
        );

        tokio::spawn(async move {
            info!("poll service started");
            while let Some(command) = rx.recv().await {
                match command {
                    PollCommand::Start {
                        zone,
                        initiator,
                        reply,
                    } => {
                        let started = match zones.zone(&zone) {
                            Some(target) => {
                                coordinator.start(target, StartOrigin::Manual { initiator })
                            }
                            None => {
                                debug!(%zone, "manual start for unknown zone");
                                if let Some(by) = &initiator {
                                    let ph = Placeholders::new().with("zone", &zone);
                                    messenger.notify(by, keys::ZONE_NOT_FOUND, &ph);
                                }
                                false
                            }
                        };
                        if let Some(reply) = reply {
                            let _ = reply.send(started);
                        }
                    }
                    PollCommand::Cancel { initiator, reply } => {
                        let cancelled = if let Some(zone) = coordinator.active_zone().cloned() {
                            let by = initiator
                                .as_ref()
                                .map_or_else(|| "console".to_string(), |p| p.to_string());
                            coordinator.cancel(
                                keys::POLL_CANCELLED,
                                Placeholders::new().with("zone", &zone).with("by", by),
                                false,
                            );
                            true
                        } else {
                            if let Some(by) = &initiator {
                                let (key, ph) = rejection_message(&PollRejection::NoActivePoll);
                                messenger.notify(by, key, &ph);
                            }
                            false
                        };
                        if let Some(reply) = reply {
                            let _ = reply.send(cancelled);
                        }
                    }
                    PollCommand::CastVote {
                        participant,
                        ballot,
                    } => coordinator.cast_vote(&participant, ballot),
                    PollCommand::Leave { participant, zone } => {
                        coordinator.leave(&participant, &zone)
                    }
                    PollCommand::ZoneChange { participant, from } => {
                        coordinator.zone_change(&participant, &from)
                    }
                    PollCommand::ZoneEntered { participant, zone } => {
                        coordinator.zone_entered(&participant, &zone)
                    }
                    PollCommand::EndTimerFired { zone } => coordinator.handle_end_timer(&zone),
                    PollCommand::WatchTick => watch.run_pass(&mut coordinator),
                    PollCommand::ResetCycle { zone } => match zone {
                        Some(zone) => coordinator.reset_attempt_cycle(&zone),
                        None => coordinator.reset_all_attempt_cycles(),
                    },
                    PollCommand::Reload => {
                        coordinator.reset_all_attempt_cycles();
                        info!("reload: attempt cycles cleared");
                    }
                    PollCommand::Status { reply } => {
                        let _ = reply.send(coordinator.status());
                    }
                    PollCommand::Shutdown { reply } => {
                        coordinator.shutdown();
                        tick_guard.cancel();
                        if let Some(reply) = reply {
                            let _ = reply.send(());
                        }
                        info!("poll service stopped");
                        return;
                    }
                }
            }
            // Every handle dropped: same exit path as an explicit shutdown.
            coordinator.shutdown();
            tick_guard.cancel();
            info!("poll service stopped");
        });

        PollHandle { tx }
    }
}

/// Cloneable entry point into the serialized loop
#[derive(Clone)]
pub struct PollHandle {
    tx: mpsc::UnboundedSender<PollCommand>,
}

impl PollHandle {
    /// Manually start a poll in `zone`; resolves to whether it started.
    pub async fn start(&self, zone: ZoneName, initiator: Option<ParticipantId>) -> bool {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(PollCommand::Start {
            zone,
            initiator,
            reply: Some(reply),
        });
        rx.await.unwrap_or(false)
    }

    /// Administratively cancel the active poll; resolves to whether one
    /// was running.
    pub async fn cancel(&self, initiator: Option<ParticipantId>) -> bool {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(PollCommand::Cancel {
            initiator,
            reply: Some(reply),
        });
        rx.await.unwrap_or(false)
    }

    /// Cast a ballot. Fire-and-forget; outcome arrives as notifications.
    pub fn cast_vote(&self, participant: ParticipantId, ballot: Ballot) {
        let _ = self.tx.send(PollCommand::CastVote {
            participant,
            ballot,
        });
    }

    /// Report a disconnect from `zone`.
    pub fn leave(&self, participant: ParticipantId, zone: ZoneName) {
        let _ = self.tx.send(PollCommand::Leave { participant, zone });
    }

    /// Report a transfer out of `from`.
    pub fn zone_change(&self, participant: ParticipantId, from: ZoneName) {
        let _ = self.tx.send(PollCommand::ZoneChange { participant, from });
    }

    /// Report an arrival in `zone`.
    pub fn zone_entered(&self, participant: ParticipantId, zone: ZoneName) {
        let _ = self.tx.send(PollCommand::ZoneEntered { participant, zone });
    }

    /// Clear one zone's attempt flag.
    pub fn reset_attempt_cycle(&self, zone: ZoneName) {
        let _ = self.tx.send(PollCommand::ResetCycle { zone: Some(zone) });
    }

    /// Clear every zone's attempt flag.
    pub fn reset_all_attempt_cycles(&self) {
        let _ = self.tx.send(PollCommand::ResetCycle { zone: None });
    }

    /// Reload: clears all attempt cycles.
    pub fn reload(&self) {
        let _ = self.tx.send(PollCommand::Reload);
    }

    /// Snapshot the coordinator state; `None` if the loop is gone.
    pub async fn status(&self) -> Option<PollStatus> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(PollCommand::Status { reply }).ok()?;
        rx.await.ok()
    }

    /// Whether a poll is active anywhere.
    pub async fn is_active(&self) -> bool {
        self.status().await.is_some_and(|s| s.is_active())
    }

    /// Zone of the active poll.
    pub async fn active_zone(&self) -> Option<ZoneName> {
        self.status().await.and_then(|s| s.zone)
    }

    /// Stop the loop, cancelling any active poll first.
    pub async fn shutdown(&self) {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(PollCommand::Shutdown { reply: Some(reply) });
        let _ = rx.await;
    }
}
