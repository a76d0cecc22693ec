//! Trainer: stratified split → forest fit → held-out metrics.

use super::split::stratified_split;
use crate::dataset::FeatureTable;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::model::{ForestParams, Model, RandomForest};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

pub const DEFAULT_TEST_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub train_size: usize,
    pub test_size: usize,
    /// Held-out metrics
    pub metrics: Metrics,
    /// Wall-clock time of one single-row prediction, microseconds
    pub single_inference_micros: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Trainer {
    params: ForestParams,
}

impl Trainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Split `table`, fit on the train rows, score the test rows.
    ///
    /// The same `seed`, rows and parameters always yield the same trees.
    pub fn train(&self, table: &FeatureTable, test_fraction: f64, seed: u64) -> Result<(Model, TrainReport)> {
        table.validate()?;
        self.params.validate()?;

        let split = stratified_split(&table.labels(), test_fraction, seed)?;
        let train = table.subset(&split.train);
        let test = table.subset(&split.test);
        info!(train = train.len(), test = test.len(), test_fraction, seed, "stratified split");

        let forest = RandomForest::fit(&train.matrix(), &train.labels(), &self.params, seed)?;
        let model = Model::new(table.schema().clone(), forest, self.params, seed);

        let proba = model.predict_matrix(&test.matrix())?;
        let metrics = Metrics::compute(&test.labels(), &proba, model.feature_importances());

        let started = Instant::now();
        if let Some(row) = test.rows().first() {
            model.predict_proba(&row.features)?;
        }
        let single_inference_micros = started.elapsed().as_secs_f64() * 1e6;

        info!(
            model_id = %model.id(),
            trees = self.params.n_trees,
            max_depth = self.params.max_depth,
            accuracy = metrics.accuracy,
            roc_auc = ?metrics.roc_auc,
            single_inference_micros,
            "model trained"
        );

        let report = TrainReport {
            train_size: train.len(),
            test_size: test.len(),
            metrics,
            single_inference_micros,
        };
        Ok((model, report))
    }
}

/// Train with the reference forest configuration (100 trees, depth 10).
pub fn train(table: &FeatureTable, test_fraction: f64, seed: u64) -> Result<(Model, TrainReport)> {
    Trainer::default().train(table, test_fraction, seed)
}
