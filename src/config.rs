//! Router configuration, loadable from a JSON file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::MarkerAnimation;
use crate::clustering::RegionGroups;
use crate::error::ConfigError;
use crate::osrm::OsrmConfig;
use crate::polyline::Polyline;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub osrm: OsrmConfig,
    /// Parallel to the depot list: group `i` is served by depot `i`.
    pub region_groups: RegionGroups,
    /// How many depots a nearest-depot query lists.
    pub nearest_limit: usize,
    /// Marker playback speed, milliseconds per path vertex.
    pub animation_step_ms: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            osrm: OsrmConfig::default(),
            region_groups: RegionGroups::yangon(),
            nearest_limit: 2,
            animation_step_ms: 200,
        }
    }
}

impl RouterConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn animation_step(&self) -> Duration {
        Duration::from_millis(self.animation_step_ms)
    }

    /// Marker playback along `path` at the configured speed.
    pub fn marker_animation(&self, path: &Polyline) -> MarkerAnimation {
        MarkerAnimation::new(path, self.animation_step())
    }
}
