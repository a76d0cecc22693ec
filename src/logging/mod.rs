//! Structured logging.

mod format;

pub use format::{PredictionRecord, StructuredLogger};
