//! File-backed home of the published model artifact.

use super::{read_artifact, write_atomic};
use crate::error::Result;
use crate::model::Model;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize and atomically replace the artifact. A retrained model supersedes the old file.
    pub fn publish(&self, model: &Model) -> Result<()> {
        let bytes = model.to_bytes()?;
        write_atomic(&self.path, &bytes)?;
        info!(
            path = %self.path.display(),
            model_id = %model.id(),
            bytes = bytes.len(),
            "model published"
        );
        Ok(())
    }

    /// Load and verify the artifact.
    pub fn load(&self) -> Result<Model> {
        let bytes = read_artifact(&self.path)?;
        let model = Model::from_bytes(&bytes)?;
        info!(path = %self.path.display(), model_id = %model.id(), "model loaded");
        Ok(model)
    }
}
