//! Binary classification scores over true labels, predicted labels and bot probabilities.

use serde::{Deserialize, Serialize};

/// Counts indexed `[true class][predicted class]`, class 0 human, 1 bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_labels(y_true: &[u8], y_pred: &[u8]) -> Self {
        let mut counts = [[0usize; 2]; 2];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            counts[t as usize][p as usize] += 1;
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        self.counts[0][0] + self.counts[1][1]
    }

    /// Rows whose true class is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.counts[class][0] + self.counts[class][1]
    }

    /// Rows predicted as `class`.
    pub fn predicted(&self, class: usize) -> usize {
        self.counts[0][class] + self.counts[1][class]
    }
}

pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    ratio(cm.correct(), cm.total())
}

/// Zero when the denominator is zero.
pub(crate) fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Area under the ROC curve via the Mann–Whitney U statistic, ties at half weight.
/// `None` when either class is absent.
pub fn roc_auc(y_true: &[u8], scores: &[f64]) -> Option<f64> {
    let n_pos = y_true.iter().filter(|&&l| l == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut pos_rank_sum = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // 1-based average rank of the tie group
        let rank = (i + j) as f64 / 2.0 + 1.0;
        pos_rank_sum += rank * order[i..=j].iter().filter(|&&k| y_true[k] == 1).count() as f64;
        i = j + 1;
    }

    let u = pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}
