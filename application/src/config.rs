//! Poll configuration
//!
//! All knobs are externally supplied (file, environment, CLI) and read
//! once at startup; the core never touches raw configuration storage.

use nightpoll_domain::{PassThreshold, ZoneName};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the poll coordinator and the night watch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// How long a poll runs before the timeout decides it, in seconds
    pub duration_secs: u64,
    /// Clock tick at which night starts
    pub night_start_tick: i64,
    /// Clock tick a passed poll advances the zone to
    pub day_start_tick: i64,
    /// Minimum zone population for an automatic poll
    pub min_participants_auto: usize,
    /// Minimum zone population for a manually started poll
    pub min_participants_manual: usize,
    /// Required yes share among the final eligible set (0.0 to 1.0)
    pub required_yes_ratio: f64,
    /// Limit automatic polls to one attempt per zone per night cycle
    pub once_per_cycle: bool,
    /// Night watch evaluation cadence, in seconds
    pub check_interval_secs: u64,
    /// Zones enabled for automatic polling, evaluated in this order
    pub auto_zones: Vec<ZoneName>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            night_start_tick: 12_550,
            day_start_tick: 1_000,
            min_participants_auto: 1,
            min_participants_manual: 1,
            required_yes_ratio: 0.51,
            once_per_cycle: true,
            check_interval_secs: 5,
            auto_zones: vec![],
        }
    }
}

impl PollConfig {
    /// Poll duration as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// Night watch cadence as a [`Duration`].
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// The pass rule, with the ratio clamped into range.
    pub fn threshold(&self) -> PassThreshold {
        PassThreshold::new(self.required_yes_ratio)
    }

    /// The population minimum for the given start kind.
    pub fn min_participants(&self, manual: bool) -> usize {
        if manual {
            self.min_participants_manual
        } else {
            self.min_participants_auto
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.duration_secs, 30);
        assert_eq!(config.night_start_tick, 12_550);
        assert_eq!(config.day_start_tick, 1_000);
        assert_eq!(config.min_participants(false), 1);
        assert_eq!(config.min_participants(true), 1);
        assert!(config.once_per_cycle);
        assert!(config.auto_zones.is_empty());
    }

    #[test]
    fn test_threshold_is_clamped() {
        let config = PollConfig {
            required_yes_ratio: 2.0,
            ..Default::default()
        };
        assert_eq!(config.threshold().ratio(), 1.0);
    }

    #[test]
    fn test_durations() {
        let config = PollConfig {
            duration_secs: 45,
            check_interval_secs: 7,
            ..Default::default()
        };
        assert_eq!(config.duration(), Duration::from_secs(45));
        assert_eq!(config.check_interval(), Duration::from_secs(7));
    }
}
