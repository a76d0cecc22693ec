//! Labeled sessions → tabular feature data.

mod builder;
mod summary;
mod table;

pub use builder::{build, DatasetBuilder};
pub use summary::{ClassSummary, FeatureSummary};
pub use table::{FeatureRow, FeatureTable};
