//! Decision-tree ensemble classifier bound to the feature schema it was trained on.
//!
//! A [`Model`] is produced by the trainer and afterwards only read: predictors and
//! evaluators share it behind an `Arc`. Retraining creates a new model.

mod artifact;
mod forest;
mod tree;

pub use forest::{ForestParams, RandomForest};
pub use tree::{DecisionTree, Node, TreeParams};

use crate::error::{Error, Result};
use crate::features::{FeatureSchema, FeatureVector};
use crate::storage::ModelStore;
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub name: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    id: Uuid,
    trained_at: DateTime<Utc>,
    seed: u64,
    params: ForestParams,
    schema: FeatureSchema,
    forest: RandomForest,
}

impl Model {
    pub fn new(schema: FeatureSchema, forest: RandomForest, params: ForestParams, seed: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            trained_at: Utc::now(),
            seed,
            params,
            schema,
            forest,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// `[P(human), P(bot)]` for an extracted feature vector.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        self.schema.ensure_matches(&FeatureVector::schema())?;
        Ok(self.forest.predict_proba(&features.to_array()))
    }

    /// Probabilities for every row of a `rows × features` matrix.
    pub fn predict_matrix(&self, x: &Array2<f64>) -> Result<Vec<[f64; 2]>> {
        if x.ncols() != self.schema.len() {
            return Err(Error::SchemaMismatch {
                expected: self.schema.names().into_iter().map(String::from).collect(),
                actual: vec![format!("{} columns", x.ncols())],
            });
        }
        Ok(x.outer_iter()
            .map(|row| self.forest.predict_proba(&row.to_vec()))
            .collect())
    }

    /// Features ranked by importance, highest first.
    pub fn feature_importances(&self) -> Vec<FeatureImportance> {
        let mut ranked: Vec<FeatureImportance> = self
            .schema
            .names()
            .into_iter()
            .zip(self.forest.feature_importances())
            .map(|(name, &importance)| FeatureImportance {
                name: name.to_string(),
                importance,
            })
            .collect();
        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        ranked
    }

    /// Atomically publish to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        ModelStore::new(path).publish(self)
    }

    pub fn load(path: &Path) -> Result<Self> {
        ModelStore::new(path).load()
    }
}
