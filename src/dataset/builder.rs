//! Sessions → feature table. Row order follows session order.

use super::{FeatureRow, FeatureTable};
use crate::error::Result;
use crate::features::{FeatureExtractor, FeatureSchema};
use crate::session::Session;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    extractor: FeatureExtractor,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract one row per session. The first failing session aborts the build and
    /// is named in the error.
    pub fn build(&self, sessions: &[Session]) -> Result<FeatureTable> {
        let mut table = FeatureTable::new(FeatureSchema::v1());
        for session in sessions {
            let features = self
                .extractor
                .extract_session(session)
                .map_err(|e| e.in_session(&session.session_id))?;
            table.push(FeatureRow {
                features,
                label: session.label(),
                session_id: session.session_id.clone(),
            });
        }
        table.validate()?;

        let [humans, bots] = table.class_counts();
        info!(rows = table.len(), humans, bots, "feature table built");
        Ok(table)
    }
}

/// Free-function form of [`DatasetBuilder::build`].
pub fn build(sessions: &[Session]) -> Result<FeatureTable> {
    DatasetBuilder::new().build(sessions)
}
