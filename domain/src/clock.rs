//! Zone clock classification
//!
//! A zone exposes its clock as a plain tick counter that wraps once per
//! day. The trigger evaluator only cares about three phases of that
//! counter, derived here from the configured night-start tick.

use serde::{Deserialize, Serialize};

/// Width of the window after night start during which an automatic poll
/// may be triggered.
pub const NIGHT_APPROACH_WINDOW: i64 = 1_000;

/// Ticks past this value count as late night / early morning, which opens
/// the next cycle just like daytime does.
pub const LATE_NIGHT_BOUND: i64 = 23_000;

/// Phase of a zone's clock as seen by the cycle evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    /// Night has just started: within the approach window where an
    /// automatic poll may be offered.
    NightApproaching,
    /// Deep night: past the approach window, before the late-night bound.
    Night,
    /// Daytime (or late night past the bound): the attempt flag for the
    /// zone may be cleared, opening a new cycle.
    Daytime,
}

impl DayPhase {
    /// Classify a clock tick against the configured night-start tick.
    pub fn from_tick(clock: i64, night_start_tick: i64) -> Self {
        if clock >= night_start_tick && clock < night_start_tick + NIGHT_APPROACH_WINDOW {
            DayPhase::NightApproaching
        } else if clock < night_start_tick || clock > LATE_NIGHT_BOUND {
            DayPhase::Daytime
        } else {
            DayPhase::Night
        }
    }

    /// Check if this phase allows triggering an automatic poll
    pub fn is_night_approaching(&self) -> bool {
        matches!(self, DayPhase::NightApproaching)
    }

    /// Check if this phase opens a new attempt cycle
    pub fn is_daytime(&self) -> bool {
        matches!(self, DayPhase::Daytime)
    }
}

impl std::fmt::Display for DayPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayPhase::NightApproaching => write!(f, "night approaching"),
            DayPhase::Night => write!(f, "night"),
            DayPhase::Daytime => write!(f, "daytime"),
        }
    }
}
