//! Game configuration
//!
//! Loaded from an optional JSON file; every field falls back to the
//! classic three-cup table.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cups on the table
    pub cup_count: usize,
    /// Distance between neighbouring slots
    pub cup_spacing: f32,

    // === Reveal ===
    /// How far a cup is raised to show the ball
    pub lift_height: f32,
    /// Seconds a lift or lower takes
    pub lift_duration: f32,

    /// Run seed; random when absent
    pub seed: Option<u64>,
    /// Where the record is kept; memory only when absent
    pub record_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cup_count: CUP_COUNT,
            cup_spacing: CUP_SPACING,
            lift_height: CUP_LIFT_HEIGHT,
            lift_duration: CUP_LIFT_DURATION,
            seed: None,
            record_path: None,
        }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {path:?}");
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cup_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "need at least 2 cups, got {}",
                self.cup_count
            )));
        }
        for (name, value) in [
            ("cup_spacing", self.cup_spacing),
            ("lift_height", self.lift_height),
            ("lift_duration", self.lift_duration),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }

    /// The configured seed, or a fresh one
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
