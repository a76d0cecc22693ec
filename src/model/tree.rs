//! CART classification tree with Gini impurity, grown over a bootstrap sample of rows.

use ndarray::Array2;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest impurity decrease accepted as a split.
const MIN_DECREASE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features drawn (without replacement) as split candidates at each node
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// Rows with `x[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class distribution `[human, bot]` of the training rows that reached the leaf.
    Leaf { proba: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    /// Normalized impurity decrease per feature (zeros if the tree never split)
    importances: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    decrease: f64,
}

struct Grower<'a, R: Rng> {
    x: &'a Array2<f64>,
    y: &'a [u8],
    params: &'a TreeParams,
    rng: &'a mut R,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `samples` (duplicates allowed).
    pub fn fit<R: Rng>(
        x: &Array2<f64>,
        y: &[u8],
        samples: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut grower = Grower {
            x,
            y,
            params,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; x.ncols()],
        };
        grower.grow(samples.to_vec(), 0);

        let mut importances = grower.importances;
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }
        Self {
            nodes: grower.nodes,
            importances,
        }
    }

    /// `[P(human), P(bot)]` for one row in schema order.
    pub fn predict_proba(&self, row: &[f64]) -> [f64; 2] {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    /// Structural check for a deserialized tree: split children lie after their
    /// parent and inside the arena, split features index into `n_features`, and
    /// leaves hold a probability distribution.
    pub(crate) fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        if self.importances.len() != n_features {
            return Err(format!(
                "{} importances for {} features",
                self.importances.len(),
                n_features
            ));
        }
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            i, feature, n_features
                        ));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= len {
                            return Err(format!(
                                "node {} has child {} outside {}..{}",
                                i,
                                child,
                                i + 1,
                                len
                            ));
                        }
                    }
                }
                Node::Leaf { proba } => {
                    let in_range = proba.iter().all(|p| (0.0..=1.0).contains(p));
                    if !in_range || (proba[0] + proba[1] - 1.0).abs() > 1e-9 {
                        return Err(format!("leaf {} has distribution {:?}", i, proba));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: usize) -> usize {
            match &nodes[at] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}

impl<'a, R: Rng> Grower<'a, R> {
    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let counts = class_counts(self.y, &rows);
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            proba: proportions(counts),
        });

        let impurity = gini(counts);
        let n = rows.len();
        if depth >= self.params.max_depth
            || n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf.max(1)
            || impurity <= 0.0
        {
            return id;
        }

        let Some(split) = self.best_split(&rows, counts, impurity) else {
            return id;
        };
        self.importances[split.feature] += split.decrease;

        let x = self.x;
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| x[[r, split.feature]] <= split.threshold);
        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn best_split(&mut self, rows: &[usize], parent: [usize; 2], impurity: f64) -> Option<Split> {
        let (x, y) = (self.x, self.y);
        let n_features = x.ncols();
        let k = self.params.max_features.clamp(1, n_features);
        let candidates = index::sample(&mut *self.rng, n_features, k);
        let min_leaf = self.params.min_samples_leaf.max(1);
        let n = rows.len();
        let weighted_parent = n as f64 * impurity;

        let mut best: Option<Split> = None;
        let mut sorted = rows.to_vec();
        for feature in candidates.iter() {
            sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

            let mut left = [0usize; 2];
            for pos in 0..n - 1 {
                left[y[sorted[pos]] as usize] += 1;
                let (n_left, n_right) = (pos + 1, n - pos - 1);
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }
                let (v, next) = (x[[sorted[pos], feature]], x[[sorted[pos + 1], feature]]);
                if v >= next {
                    continue;
                }
                let right = [parent[0] - left[0], parent[1] - left[1]];
                let decrease = weighted_parent
                    - n_left as f64 * gini(left)
                    - n_right as f64 * gini(right);
                if decrease > best.map_or(MIN_DECREASE, |b| b.decrease) {
                    let mid = v + (next - v) / 2.0;
                    best = Some(Split {
                        feature,
                        threshold: if mid < next { mid } else { v },
                        decrease,
                    });
                }
            }
        }
        best
    }
}

fn class_counts(y: &[u8], rows: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &r in rows {
        counts[y[r] as usize] += 1;
    }
    counts
}

fn proportions(counts: [usize; 2]) -> [f64; 2] {
    let n = counts[0] + counts[1];
    if n == 0 {
        return [0.5, 0.5];
    }
    [counts[0] as f64 / n as f64, counts[1] as f64 / n as f64]
}

fn gini(counts: [usize; 2]) -> f64 {
    let [p0, p1] = proportions(counts);
    1.0 - p0 * p0 - p1 * p1
}
