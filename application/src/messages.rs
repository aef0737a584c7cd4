//! Message keys and placeholder maps
//!
//! The core addresses every outgoing message by a key from [`keys`] plus a
//! flat string-to-string placeholder map. Rendering is the messenger
//! adapter's job.

use nightpoll_domain::PollRejection;
use std::collections::BTreeMap;

/// Message keys the core emits
pub mod keys {
    /// Broadcast: an automatic or manual poll opened. `zone`, `duration`
    pub const POLL_STARTED: &str = "poll_started";
    /// Broadcast: a manual poll opened. `zone`, `duration`, `initiator`
    pub const POLL_STARTED_MANUAL: &str = "poll_started_manual";
    /// Broadcast: how to cast a ballot. `duration`
    pub const POLL_INSTRUCTIONS: &str = "poll_instructions";
    /// Broadcast: a participant cast a ballot. `participant`, `ballot`
    pub const PARTICIPANT_VOTED: &str = "participant_voted";
    /// Broadcast: a voter left and their ballot was discarded. `participant`, `zone`
    pub const VOTE_WITHDRAWN: &str = "vote_withdrawn";
    /// Broadcast: vote totals at the decision. `yes`, `no`, `eligible`, `zone`
    pub const POLL_RESULTS: &str = "poll_results";
    /// Broadcast: the poll passed. `zone`
    pub const POLL_PASSED: &str = "poll_passed";
    /// Broadcast: the poll failed. `zone`
    pub const POLL_FAILED: &str = "poll_failed";
    /// Broadcast: passed, but the zone's clock cannot be changed. `zone`
    pub const CLOCK_UNCHANGED: &str = "clock_unchanged";
    /// Broadcast: every eligible voter left the zone. `zone`
    pub const ALL_ELIGIBLE_LEFT: &str = "all_eligible_left";
    /// Broadcast: the poll was cancelled by an administrator. `zone`, `by`
    pub const POLL_CANCELLED: &str = "poll_cancelled";
    /// Broadcast: the poll was cancelled because the host is shutting down. `zone`
    pub const POLL_CANCELLED_SHUTDOWN: &str = "poll_cancelled_shutdown";
    /// Notify: a poll is running in the zone the participant just entered. `zone`
    pub const POLL_IN_PROGRESS: &str = "poll_in_progress";

    /// Notify: a poll is already active elsewhere. `other_zone`
    pub const POLL_ALREADY_ACTIVE: &str = "poll_already_active";
    /// Notify: the target zone does not allow polls. `zone`
    pub const ZONE_NOT_VOTABLE: &str = "zone_not_votable";
    /// Notify: no zone with that name exists. `zone`
    pub const ZONE_NOT_FOUND: &str = "zone_not_found";
    /// Notify: too few participants to start. `zone`, `need`, `have`
    pub const NOT_ENOUGH_PARTICIPANTS: &str = "not_enough_participants";
    /// Notify: there is no poll to act on.
    pub const NO_ACTIVE_POLL: &str = "no_active_poll";
    /// Notify: the participant is outside the poll's zone. `zone`
    pub const NOT_IN_POLL_ZONE: &str = "not_in_poll_zone";
    /// Notify: the participant is not in the electorate.
    pub const NOT_ELIGIBLE: &str = "not_eligible";
    /// Notify: the participant already has a recorded ballot.
    pub const ALREADY_VOTED: &str = "already_voted";

    /// Every key the core emits, for adapters that want to verify their
    /// catalog is complete.
    pub const ALL: [&str; 21] = [
        POLL_STARTED,
        POLL_STARTED_MANUAL,
        POLL_INSTRUCTIONS,
        PARTICIPANT_VOTED,
        VOTE_WITHDRAWN,
        POLL_RESULTS,
        POLL_PASSED,
        POLL_FAILED,
        CLOCK_UNCHANGED,
        ALL_ELIGIBLE_LEFT,
        POLL_CANCELLED,
        POLL_CANCELLED_SHUTDOWN,
        POLL_IN_PROGRESS,
        POLL_ALREADY_ACTIVE,
        ZONE_NOT_VOTABLE,
        ZONE_NOT_FOUND,
        NOT_ENOUGH_PARTICIPANTS,
        NO_ACTIVE_POLL,
        NOT_IN_POLL_ZONE,
        NOT_ELIGIBLE,
        ALREADY_VOTED,
    ];
}

/// Flat string-to-string substitution map for a message
///
/// Backed by a BTreeMap so rendered output is deterministic in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders(BTreeMap<String, String>);

impl Placeholders {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder, builder style.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up a placeholder value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate placeholder pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether the map holds no placeholders.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Map a rejection to the message key and placeholders used to surface it.
pub fn rejection_message(rejection: &PollRejection) -> (&'static str, Placeholders) {
    match rejection {
        PollRejection::AlreadyActive { zone } => (
            keys::POLL_ALREADY_ACTIVE,
            Placeholders::new().with("other_zone", zone),
        ),
        PollRejection::ZoneNotVotable { zone } => {
            (keys::ZONE_NOT_VOTABLE, Placeholders::new().with("zone", zone))
        }
        PollRejection::NotEnoughParticipants { zone, have, need } => (
            keys::NOT_ENOUGH_PARTICIPANTS,
            Placeholders::new()
                .with("zone", zone)
                .with("have", have)
                .with("need", need),
        ),
        PollRejection::NoActivePoll => (keys::NO_ACTIVE_POLL, Placeholders::new()),
        PollRejection::NotInPollZone { zone } => {
            (keys::NOT_IN_POLL_ZONE, Placeholders::new().with("zone", zone))
        }
        PollRejection::NotEligible => (keys::NOT_ELIGIBLE, Placeholders::new()),
        PollRejection::AlreadyVoted => (keys::ALREADY_VOTED, Placeholders::new()),
        PollRejection::ClockUnchangeable { zone } => {
            (keys::CLOCK_UNCHANGED, Placeholders::new().with("zone", zone))
        }
    }
}
