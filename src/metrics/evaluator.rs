//! Scores a model over an arbitrary feature table without touching the model.

use super::Metrics;
use crate::dataset::FeatureTable;
use crate::error::Result;
use crate::model::Model;
use std::sync::Arc;
use tracing::info;

pub struct Evaluator {
    model: Arc<Model>,
}

impl Evaluator {
    pub fn new(model: Arc<Model>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn evaluate(&self, table: &FeatureTable) -> Result<Metrics> {
        evaluate(&self.model, table)
    }
}

/// Accuracy, ROC-AUC, confusion matrix, per-class metrics and importances over `table`.
pub fn evaluate(model: &Model, table: &FeatureTable) -> Result<Metrics> {
    table.validate()?;
    model.schema().ensure_matches(table.schema())?;

    let proba = model.predict_matrix(&table.matrix())?;
    let metrics = Metrics::compute(&table.labels(), &proba, model.feature_importances());
    info!(
        model_id = %model.id(),
        samples = metrics.samples,
        accuracy = metrics.accuracy,
        roc_auc = ?metrics.roc_auc,
        "evaluation complete"
    );
    Ok(metrics)
}
