//! Application layer for nightpoll
//!
//! Use cases and ports: the poll coordinator state machine, the night
//! watch cycle evaluator, and the serialized command loop that owns both.
//! External collaborators (zones, participant directory, scheduler,
//! messaging) are reached only through the port traits in [`ports`].

pub mod config;
pub mod coordinator;
pub mod messages;
pub mod ports;
pub mod service;
pub mod watch;

// Re-export commonly used types
pub use config::PollConfig;
pub use coordinator::{PollCoordinator, PollStatus, StartOrigin};
pub use messages::{Placeholders, keys};
pub use ports::{
    directory::ParticipantDirectory,
    messenger::{Messenger, NullMessenger},
    scheduler::{Scheduler, TimerGuard},
    zone::{Zone, ZoneRef, ZoneRegistry},
};
pub use service::{PollCommand, PollHandle, PollService};
pub use watch::NightWatch;
