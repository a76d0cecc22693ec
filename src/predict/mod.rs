//! Human/bot decisions for unseen trajectories.

mod engine;

pub use engine::{predict, Prediction, Predictor};
