//! Messaging port
//!
//! The core never renders text: it hands the adapter a message key and a
//! flat placeholder map. Resolution, templating and localization are
//! entirely the adapter's concern.

use super::zone::Zone;
use crate::messages::Placeholders;
use nightpoll_domain::ParticipantId;

/// Delivery of keyed messages to participants and zones
pub trait Messenger: Send + Sync {
    /// Deliver a message to a single participant.
    fn notify(&self, participant: &ParticipantId, key: &str, placeholders: &Placeholders);

    /// Deliver a message to every participant currently in `zone`.
    fn broadcast(&self, zone: &dyn Zone, key: &str, placeholders: &Placeholders);
}

/// No-op messenger for when delivery is not needed
pub struct NullMessenger;

impl Messenger for NullMessenger {
    fn notify(&self, _participant: &ParticipantId, _key: &str, _placeholders: &Placeholders) {}
    fn broadcast(&self, _zone: &dyn Zone, _key: &str, _placeholders: &Placeholders) {}
}
