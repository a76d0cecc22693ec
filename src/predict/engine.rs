//! Applies a loaded model to new trajectories: extract → schema check → class probabilities.

use crate::error::Result;
use crate::features::{FeatureExtractor, FeatureVector};
use crate::model::Model;
use crate::session::{Point, PredictInput, SessionKind};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: SessionKind,
    /// Probability of `label` as a percentage, in [50, 100]
    pub confidence: f64,
    pub human_probability: f64,
    pub bot_probability: f64,
    pub features: FeatureVector,
}

impl Prediction {
    fn from_proba(proba: [f64; 2], features: FeatureVector) -> Self {
        let [human, bot] = proba;
        let label = if bot > human {
            SessionKind::Bot
        } else {
            SessionKind::Human
        };
        Self {
            label,
            confidence: human.max(bot) * 100.0,
            human_probability: human,
            bot_probability: bot,
            features,
        }
    }
}

pub struct Predictor {
    model: Arc<Model>,
    extractor: FeatureExtractor,
}

impl Predictor {
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Load a published artifact; the only way to obtain a model at the boundary.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(Arc::new(Model::load(path)?)))
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn predict(&self, input: &PredictInput) -> Result<Prediction> {
        let prediction = self.predict_points(input.points(), input.duration_hint())?;
        debug!(
            session_id = input.session_id().unwrap_or("-"),
            label = %prediction.label,
            confidence = prediction.confidence,
            "prediction"
        );
        Ok(prediction)
    }

    pub fn predict_points(&self, points: &[Point], duration_hint: Option<f64>) -> Result<Prediction> {
        let features = self.extractor.extract(points, duration_hint)?;
        self.predict_features(&features)
    }

    pub fn predict_features(&self, features: &FeatureVector) -> Result<Prediction> {
        let proba = self.model.predict_proba(features)?;
        Ok(Prediction::from_proba(proba, *features))
    }

    /// One result per input; a failing record does not stop the rest.
    pub fn predict_batch(&self, inputs: &[PredictInput]) -> Vec<Result<Prediction>> {
        inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let result = self.predict(input);
                if let Err(e) = &result {
                    warn!(index = i, session_id = input.session_id().unwrap_or("-"), error = %e, "prediction failed");
                }
                result
            })
            .collect()
    }
}

/// Predict a single trajectory with `model`.
pub fn predict(model: &Model, points: &[Point], duration_hint: Option<f64>) -> Result<Prediction> {
    let features = FeatureExtractor::new().extract(points, duration_hint)?;
    let proba = model.predict_proba(&features)?;
    Ok(Prediction::from_proba(proba, features))
}
