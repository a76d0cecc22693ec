//! Aggregate and per-class classification metrics.

mod evaluator;
mod scoring;

pub use evaluator::{evaluate, Evaluator};
pub use scoring::{accuracy, roc_auc, ConfusionMatrix};

use crate::model::FeatureImportance;
use scoring::ratio;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Fraction of this class's rows classified correctly (equals recall)
    pub accuracy: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn from_confusion(cm: &ConfusionMatrix, class: usize) -> Self {
        let tp = cm.counts[class][class];
        let precision = ratio(tp, cm.predicted(class));
        let recall = ratio(tp, cm.support(class));
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
            accuracy: recall,
            support: cm.support(class),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub samples: usize,
    pub accuracy: f64,
    /// Absent when the scored rows contain a single class
    pub roc_auc: Option<f64>,
    pub confusion: ConfusionMatrix,
    pub human: ClassMetrics,
    pub bot: ClassMetrics,
    /// Highest first
    pub feature_importances: Vec<FeatureImportance>,
}

impl Metrics {
    /// Score `[P(human), P(bot)]` predictions against true labels. Predicted class is the arg-max.
    pub fn compute(
        y_true: &[u8],
        proba: &[[f64; 2]],
        feature_importances: Vec<FeatureImportance>,
    ) -> Self {
        let y_pred: Vec<u8> = proba.iter().map(|p| u8::from(p[1] > p[0])).collect();
        let bot_scores: Vec<f64> = proba.iter().map(|p| p[1]).collect();
        let confusion = ConfusionMatrix::from_labels(y_true, &y_pred);
        Self {
            samples: y_true.len(),
            accuracy: accuracy(&confusion),
            roc_auc: roc_auc(y_true, &bot_scores),
            confusion,
            human: ClassMetrics::from_confusion(&confusion, 0),
            bot: ClassMetrics::from_confusion(&confusion, 1),
            feature_importances,
        }
    }
}

impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "samples:  {}", self.samples)?;
        writeln!(f, "accuracy: {:.3}", self.accuracy)?;
        match self.roc_auc {
            Some(auc) => writeln!(f, "roc_auc:  {:.3}", auc)?,
            None => writeln!(f, "roc_auc:  n/a (single class)")?,
        }
        writeln!(f)?;
        writeln!(f, "{:>8} {:>9} {:>7} {:>7} {:>8}", "", "precision", "recall", "f1", "support")?;
        for (name, m) in [("human", &self.human), ("bot", &self.bot)] {
            writeln!(
                f,
                "{:>8} {:>9.3} {:>7.3} {:>7.3} {:>8}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        let c = &self.confusion.counts;
        writeln!(f, "confusion (rows true, cols predicted)")?;
        writeln!(f, "{:>8} {:>6} {:>6}", "", "human", "bot")?;
        writeln!(f, "{:>8} {:>6} {:>6}", "human", c[0][0], c[0][1])?;
        writeln!(f, "{:>8} {:>6} {:>6}", "bot", c[1][0], c[1][1])?;
        writeln!(f)?;
        writeln!(f, "feature importance")?;
        for fi in &self.feature_importances {
            writeln!(f, "  {:<18} {:.3}", fi.name, fi.importance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_from_probabilities() {
        let y = [0, 0, 1, 1];
        let proba = [[0.9, 0.1], [0.4, 0.6], [0.2, 0.8], [0.5, 0.5]];
        let m = Metrics::compute(&y, &proba, Vec::new());
        // tie at 0.5 predicts human
        assert_eq!(m.confusion.counts, [[1, 1], [1, 1]]);
        assert_eq!(m.accuracy, 0.5);
        assert_eq!(m.bot.precision, 0.5);
        assert_eq!(m.human.recall, 0.5);
        assert_eq!(m.human.accuracy, m.human.recall);
        assert_eq!(m.bot.support, 2);
        // positives 0.8, 0.5 vs negatives 0.1, 0.6 -> 3 of 4 pairs
        assert_eq!(m.roc_auc, Some(0.75));
    }

    #[test]
    fn zero_predictions_give_zero_precision() {
        let m = Metrics::compute(&[0, 1], &[[0.9, 0.1], [0.8, 0.2]], Vec::new());
        assert_eq!(m.bot.precision, 0.0);
        assert_eq!(m.bot.f1, 0.0);
        assert!(m.to_string().contains("accuracy: 0.500"));
    }
}
