//! Detector configuration: file locations, forest hyperparameters, training split, logging.

use crate::error::{Error, Result};
use crate::model::ForestParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "MOTION_GUARD_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Session and feature table locations
    pub data: DataConfig,
    /// Model artifact location
    pub model: ModelConfig,
    /// Random forest hyperparameters
    pub forest: ForestParams,
    /// Split and seed
    pub training: TrainingConfig,
    /// Synthetic session counts
    pub synth: SynthConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub sessions_path: PathBuf,
    pub features_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Held-out fraction, in (0, 1)
    pub test_fraction: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub human_sessions: usize,
    pub bot_sessions: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sessions_path: PathBuf::from("data/all_sessions.json"),
            features_path: PathBuf::from("data/features.csv"),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/mouse_model.json"),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: crate::train::DEFAULT_TEST_FRACTION,
            seed: 42,
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            human_sessions: 50,
            bot_sessions: 50,
            seed: 42,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl DetectorConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<DetectorConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }

    /// Path from `MOTION_GUARD_CONFIG`, else `config.json`.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        let f = self.training.test_fraction;
        if !(f > 0.0 && f < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "training.test_fraction must be in (0, 1), got {}",
                f
            )));
        }
        self.forest.validate()
    }
}
