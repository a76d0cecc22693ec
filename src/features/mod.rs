//! Behavioral feature extraction from raw pointer trajectories.

mod kinematics;
mod pipeline;
mod schema;

pub use kinematics::{duration_from_timestamps, SpeedProfile};
pub use pipeline::{extract, FeatureExtractor, MIN_POINTS};
pub use schema::{FeatureColumn, FeatureKind, FeatureSchema, FEATURE_NAMES, ID_COLUMN, LABEL_COLUMN};

pub(crate) use kinematics::{mean, population_std};

use serde::{Deserialize, Serialize};

/// The four-number behavioral summary of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub std_speed: f64,
    pub max_speed: f64,
    pub num_points: usize,
    pub session_duration: f64,
}

impl FeatureVector {
    /// Schema every extracted vector conforms to.
    pub fn schema() -> FeatureSchema {
        FeatureSchema::v1()
    }

    /// Values in schema order.
    pub fn to_array(&self) -> [f64; 4] {
        [
            self.std_speed,
            self.max_speed,
            self.num_points as f64,
            self.session_duration,
        ]
    }
}
