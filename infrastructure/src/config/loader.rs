//! Configuration loader with multi-source merging

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use nightpoll_application::PollConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A zone the simulation world starts with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSeed {
    /// Zone name
    pub name: String,
    /// Whether polls may be held here
    #[serde(default = "default_votable")]
    pub votable: bool,
    /// Initial clock tick
    #[serde(default)]
    pub clock: i64,
}

fn default_votable() -> bool {
    true
}

/// World-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Zones to create at startup
    pub zones: Vec<ZoneSeed>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            zones: vec![ZoneSeed {
                name: "overworld".to_string(),
                votable: true,
                clock: 0,
            }],
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Poll coordination settings
    pub poll: PollConfig,
    /// Simulated world layout
    pub world: WorldConfig,
}

/// Configuration loader that merges multiple sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `NIGHTPOLL_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./nightpoll.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<AppConfig, figment::Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let project = PathBuf::from("nightpoll.toml");
        if project.exists() {
            figment = figment.merge(Toml::file(&project));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("NIGHTPOLL_").split("__"));

        figment.extract()
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> AppConfig {
        AppConfig::default()
    }
}
