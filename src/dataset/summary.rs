//! Per-class feature statistics for reporting.

use super::FeatureTable;
use crate::features::{mean, population_std};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub name: String,
    pub human_mean: f64,
    pub human_std: f64,
    pub bot_mean: f64,
    pub bot_std: f64,
    /// `|μh − μb| / (σh + σb) × 100`; 0 when both spreads are 0
    pub discrimination: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub human_count: usize,
    pub bot_count: usize,
    pub features: Vec<FeatureSummary>,
}

impl ClassSummary {
    pub fn from_table(table: &FeatureTable) -> Self {
        let [human_count, bot_count] = table.class_counts();
        let features = table
            .schema()
            .names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let column = |label: u8| -> Vec<f64> {
                    table
                        .rows()
                        .iter()
                        .filter(|r| r.label == label)
                        .map(|r| r.features.to_array()[i])
                        .collect()
                };
                let (human, bot) = (column(0), column(1));
                let human_mean = mean(&human).unwrap_or(0.0);
                let bot_mean = mean(&bot).unwrap_or(0.0);
                let human_std = population_std(&human).unwrap_or(0.0);
                let bot_std = population_std(&bot).unwrap_or(0.0);
                let spread = human_std + bot_std;
                let discrimination = if spread > 0.0 {
                    (human_mean - bot_mean).abs() / spread * 100.0
                } else {
                    0.0
                };
                FeatureSummary {
                    name: name.to_string(),
                    human_mean,
                    human_std,
                    bot_mean,
                    bot_std,
                    discrimination,
                }
            })
            .collect();

        Self {
            human_count,
            bot_count,
            features,
        }
    }

    /// Feature with the highest discrimination score.
    pub fn best_feature(&self) -> Option<&FeatureSummary> {
        self.features
            .iter()
            .max_by(|a, b| a.discrimination.total_cmp(&b.discrimination))
    }
}

impl std::fmt::Display for ClassSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "sessions: {} (human {}, bot {})",
            self.human_count + self.bot_count,
            self.human_count,
            self.bot_count
        )?;
        for s in &self.features {
            writeln!(
                f,
                "{:<18} human μ={:.3} σ={:.3}  bot μ={:.3} σ={:.3}  discrimination {:.1}%",
                s.name, s.human_mean, s.human_std, s.bot_mean, s.bot_std, s.discrimination
            )?;
        }
        Ok(())
    }
}
