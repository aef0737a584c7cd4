//! Zone port
//!
//! A zone is the environment a poll applies to: it has a name, a set of
//! present participants, and a mutable clock. The hosting runtime owns the
//! real thing; the core only sees this contract.

use nightpoll_domain::{ParticipantId, ZoneName};
use std::sync::Arc;

/// A pollable environment
pub trait Zone: Send + Sync {
    /// Unique name of the zone.
    fn name(&self) -> ZoneName;

    /// Participants currently present in the zone.
    fn participants(&self) -> Vec<ParticipantId>;

    /// Current clock tick of the zone.
    fn clock(&self) -> i64;

    /// Set the zone's clock tick.
    fn set_clock(&self, tick: i64);

    /// Whether polls may be held (and the clock advanced) here.
    fn is_votable(&self) -> bool;
}

/// Shared handle to a zone
pub type ZoneRef = Arc<dyn Zone>;

/// Lookup of zones by name
pub trait ZoneRegistry: Send + Sync {
    /// Resolve a zone by name, `None` if unknown or not loaded.
    fn zone(&self, name: &ZoneName) -> Option<ZoneRef>;

    /// All currently known zones.
    fn zones(&self) -> Vec<ZoneRef>;
}
