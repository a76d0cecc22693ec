//! Motion Guard: behavioral pointer-movement bot detection.
//!
//! Modular structure:
//! - [`session`] — Trajectory points, session records, predictor input
//! - [`features`] — Speed-statistics feature extraction and the fixed feature schema
//! - [`dataset`] — Sessions → feature table, CSV interchange, class summaries
//! - [`model`] — Random forest classifier and the persisted model artifact
//! - [`train`] — Stratified split and training
//! - [`metrics`] — Accuracy, ROC-AUC, confusion matrix, evaluator
//! - [`predict`] — Human/bot decisions with confidence
//! - [`storage`] — Atomic artifact publication
//! - [`synth`] — Seeded synthetic sessions
//! - [`logging`] — Structured logging
//!
//! Data flow: sessions → [`features`] → [`dataset`] → [`train`] → model artifact →
//! [`predict`] / [`metrics`].

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod predict;
pub mod session;
pub mod storage;
pub mod synth;
pub mod train;

pub use config::DetectorConfig;
pub use dataset::{DatasetBuilder, FeatureTable};
pub use error::{Error, Result};
pub use features::{FeatureExtractor, FeatureSchema, FeatureVector};
pub use logging::StructuredLogger;
pub use metrics::{evaluate, Evaluator, Metrics};
pub use model::Model;
pub use predict::{predict, Prediction, Predictor};
pub use session::{Point, PredictInput, Session, SessionKind};
pub use train::{train, TrainReport, Trainer};
