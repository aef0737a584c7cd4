//! Night watch cycle evaluator
//!
//! Runs on a fixed cadence and asks the coordinator to auto-start a poll
//! when a managed zone's clock enters the night-approach window. The
//! once-per-cycle flag keeps a zone from being offered a second poll in
//! the same night; observing daytime is the only thing that opens the
//! next cycle.

use crate::config::PollConfig;
use crate::coordinator::{PollCoordinator, StartOrigin};
use crate::ports::zone::{Zone, ZoneRegistry};
use nightpoll_domain::DayPhase;
use std::sync::Arc;
use tracing::{debug, info};

/// Evaluates managed zones once per tick of the watch cadence
pub struct NightWatch {
    config: PollConfig,
    zones: Arc<dyn ZoneRegistry>,
}

impl NightWatch {
    pub fn new(config: PollConfig, zones: Arc<dyn ZoneRegistry>) -> Self {
        Self { config, zones }
    }

    /// Evaluate every managed zone, in configured order.
    ///
    /// Skipped entirely while a poll is active anywhere. At most one
    /// automatic poll starts per pass: the first zone that qualifies wins
    /// and the pass stops. There is no fairness rotation.
    pub fn run_pass(&self, coordinator: &mut PollCoordinator) {
        if coordinator.is_active() {
            return;
        }

        for name in &self.config.auto_zones {
            let Some(zone) = self.zones.zone(name) else {
                continue;
            };
            if !zone.is_votable() {
                continue;
            }

            match DayPhase::from_tick(zone.clock(), self.config.night_start_tick) {
                DayPhase::NightApproaching => {
                    if self.config.once_per_cycle && coordinator.cycle_attempted(name) {
                        continue;
                    }

                    let population = zone.participants().len();
                    if population >= self.config.min_participants_auto {
                        if coordinator.start(zone, StartOrigin::Automatic) {
                            info!(zone = %name, "automatic poll triggered");
                            return;
                        }
                    } else {
                        debug!(
                            zone = %name,
                            population,
                            need = self.config.min_participants_auto,
                            "too few participants for an automatic poll"
                        );
                        // Keep the zone retryable later this night
                        if !coordinator.cycle_attempted(name) {
                            coordinator.clear_cycle_attempt(name);
                        }
                    }
                }
                DayPhase::Daytime => {
                    if coordinator.cycle_attempted(name) {
                        coordinator.clear_cycle_attempt(name);
                        debug!(zone = %name, "daytime observed, new cycle opened");
                    }
                }
                DayPhase::Night => {}
            }
        }
    }
}
