//! Persistence primitives for model artifacts, feature tables and session files.

mod atomic;
mod model_store;

pub use atomic::{checksum, read_artifact, write_atomic};
pub use model_store::ModelStore;
