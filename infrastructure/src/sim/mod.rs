//! In-memory simulation world
//!
//! Implements the zone and directory ports over plain shared state so the
//! CLI (and tests) can drive membership churn and clocks by hand.

pub mod world;
pub mod zone;

pub use world::SimWorld;
pub use zone::SimZone;
