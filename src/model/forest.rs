//! Random forest: bootstrap-aggregated CART trees averaging class probabilities.
//!
//! Tree `i` draws all of its randomness (bootstrap rows and per-node feature
//! subsets) from a ChaCha8 stream keyed by the master seed with stream id `i`.
//! Trees are therefore independent of build order, and a parallel build produces
//! the same forest as a sequential one.

use super::tree::{DecisionTree, TreeParams};
use crate::error::{Error, Result};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Split candidates per node; `None` means `floor(sqrt(n_features))`
    pub max_features: Option<usize>,
    pub bootstrap: bool,
    /// Build trees on the rayon pool
    pub parallel: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            parallel: true,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(Error::InvalidConfig("n_trees must be at least 1".into()));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidConfig("max_depth must be at least 1".into()));
        }
        if self.min_samples_split < 2 {
            return Err(Error::InvalidConfig("min_samples_split must be at least 2".into()));
        }
        if self.min_samples_leaf == 0 {
            return Err(Error::InvalidConfig("min_samples_leaf must be at least 1".into()));
        }
        if self.max_features == Some(0) {
            return Err(Error::InvalidConfig("max_features must be at least 1".into()));
        }
        Ok(())
    }

    fn tree_params(&self, n_features: usize) -> TreeParams {
        let sqrt = (n_features as f64).sqrt().floor() as usize;
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features.unwrap_or(sqrt).clamp(1, n_features),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
    importances: Vec<f64>,
}

impl RandomForest {
    /// Fit on `x` (rows × features) with binary labels `y`.
    pub fn fit(x: &Array2<f64>, y: &[u8], params: &ForestParams, seed: u64) -> Result<Self> {
        params.validate()?;
        let (n, n_features) = x.dim();
        if n == 0 || n_features == 0 {
            return Err(Error::InsufficientSamples("empty training matrix".into()));
        }
        if n != y.len() {
            return Err(Error::InvalidConfig(format!(
                "{} rows but {} labels",
                n,
                y.len()
            )));
        }
        if let Some(bad) = y.iter().find(|&&l| l > 1) {
            return Err(Error::Schema(format!("label must be 0 or 1, got {}", bad)));
        }

        let tree_params = params.tree_params(n_features);
        let grow = |i: usize| {
            let mut rng = tree_rng(seed, i);
            let rows: Vec<usize> = if params.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            DecisionTree::fit(x, y, &rows, &tree_params, &mut rng)
        };
        let trees: Vec<DecisionTree> = if params.parallel {
            (0..params.n_trees).into_par_iter().map(grow).collect()
        } else {
            (0..params.n_trees).map(grow).collect()
        };

        let importances = mean_importances(&trees, n_features);
        debug!(
            trees = trees.len(),
            rows = n,
            max_features = tree_params.max_features,
            "forest fitted"
        );
        Ok(Self {
            n_features,
            trees,
            importances,
        })
    }

    /// Mean of the per-tree leaf distributions, `[P(human), P(bot)]`.
    pub fn predict_proba(&self, row: &[f64]) -> [f64; 2] {
        let mut sum = [0.0; 2];
        for tree in &self.trees {
            let p = tree.predict_proba(row);
            sum[0] += p[0];
            sum[1] += p[1];
        }
        let n = self.trees.len().max(1) as f64;
        [sum[0] / n, sum[1] / n]
    }

    /// Arg-max class; ties go to human (0).
    pub fn predict(&self, row: &[f64]) -> u8 {
        let [human, bot] = self.predict_proba(row);
        u8::from(bot > human)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean decrease in impurity, summing to 1 unless no tree ever split.
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    /// At least one tree, and every tree structurally sound for `n_features` inputs.
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        if self.importances.len() != self.n_features {
            return Err(format!(
                "{} importances for {} features",
                self.importances.len(),
                self.n_features
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

fn tree_rng(seed: u64, tree_index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(tree_index as u64);
    rng
}

fn mean_importances(trees: &[DecisionTree], n_features: usize) -> Vec<f64> {
    let mut out = vec![0.0; n_features];
    for tree in trees {
        for (acc, v) in out.iter_mut().zip(tree.feature_importances()) {
            *acc += v;
        }
    }
    let total: f64 = out.iter().sum();
    if total > 0.0 {
        out.iter_mut().for_each(|v| *v /= total);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two noisy clusters; feature 2 carries the signal.
    fn toy() -> (Array2<f64>, Vec<u8>) {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let n = 80;
        let mut data = Vec::with_capacity(n * 4);
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let label = (i % 2) as u8;
            data.push(rng.gen_range(0.0..1.0));
            data.push(rng.gen_range(0.0..1.0));
            data.push(label as f64 * 5.0 + rng.gen_range(0.0..1.0));
            data.push(rng.gen_range(0.0..1.0));
            y.push(label);
        }
        (Array2::from_shape_vec((n, 4), data).unwrap(), y)
    }

    fn small(parallel: bool) -> ForestParams {
        ForestParams {
            n_trees: 15,
            parallel,
            ..ForestParams::default()
        }
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let (x, y) = toy();
        let a = RandomForest::fit(&x, &y, &small(true), 42).unwrap();
        let b = RandomForest::fit(&x, &y, &small(false), 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seed_changes_the_forest() {
        let (x, y) = toy();
        let a = RandomForest::fit(&x, &y, &small(false), 1).unwrap();
        let b = RandomForest::fit(&x, &y, &small(false), 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn learns_the_signal_feature() {
        let (x, y) = toy();
        let forest = RandomForest::fit(&x, &y, &small(true), 42).unwrap();
        let imp = forest.feature_importances();
        assert!((imp.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        let top = (0..4).max_by(|&a, &b| imp[a].total_cmp(&imp[b])).unwrap();
        assert_eq!(top, 2);

        assert_eq!(forest.predict(&[0.5, 0.5, 5.5, 0.5]), 1);
        assert_eq!(forest.predict(&[0.5, 0.5, 0.5, 0.5]), 0);
        let p = forest.predict_proba(&[0.5, 0.5, 5.5, 0.5]);
        assert!((p[0] + p[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_params_rejected() {
        let (x, y) = toy();
        let p = ForestParams {
            n_trees: 0,
            ..ForestParams::default()
        };
        assert!(matches!(RandomForest::fit(&x, &y, &p, 0), Err(Error::InvalidConfig(_))));
        assert!(matches!(
            RandomForest::fit(&x, &y[..10], &ForestParams::default(), 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn default_max_features_is_sqrt() {
        assert_eq!(ForestParams::default().tree_params(4).max_features, 2);
        assert_eq!(ForestParams::default().tree_params(1).max_features, 1);
    }
}
