//! Visualizer tuning
//!
//! Stored as RON. Every field has a default, so a config file only needs
//! the values it changes:
//!
//! ```ron
//! (initial_score: 640, seed: Some(7))
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::score::Score;

/// Tuning knobs for one mounted scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Score shown at mount
    pub initial_score: Score,
    /// Fraction of the remaining distance the indicator covers each frame
    pub smoothing: f32,
    /// Resting height of the indicator
    pub float_base: f32,
    /// Vertical bob amplitude
    pub float_amplitude: f32,
    /// Bob angular rate in radians per second
    pub float_rate: f32,
    /// Ring rotation per frame in radians
    pub ring_spin: f32,
    /// Buildings generated per score band
    pub buildings_per_band: usize,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Fixed seed for the skyline; `None` varies per mount
    pub seed: Option<u64>,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            initial_score: Score::default(),
            smoothing: 0.05,
            float_base: 5.0,
            float_amplitude: 0.5,
            float_rate: 1.0,
            ring_spin: 0.01,
            buildings_per_band: 5,
            fov: 60.0,
            seed: None,
        }
    }
}

impl CityConfig {
    /// Parse and validate RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: CityConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "smoothing must be in (0, 1], got {}",
                self.smoothing
            )));
        }
        if self.buildings_per_band == 0 {
            return Err(ConfigError::Invalid("buildings_per_band must be at least 1".into()));
        }
        if !(self.fov > 1.0 && self.fov < 179.0) {
            return Err(ConfigError::Invalid(format!("fov must be in (1, 179), got {}", self.fov)));
        }
        if self.float_amplitude < 0.0 {
            return Err(ConfigError::Invalid("float_amplitude cannot be negative".into()));
        }
        Ok(())
    }
}
