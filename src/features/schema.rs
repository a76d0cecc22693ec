//! Ordered feature schema shared by the feature table, the trainer and persisted models.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Model input columns, in model order.
pub const FEATURE_NAMES: [&str; 4] = ["std_speed", "max_speed", "num_points", "session_duration"];

/// Non-feature columns appended to every feature table row.
pub const LABEL_COLUMN: &str = "label";
pub const ID_COLUMN: &str = "session_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Float,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    pub kind: FeatureKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub const CURRENT_VERSION: u32 = 1;

    /// The fixed four-feature schema.
    pub fn v1() -> Self {
        let kinds = [
            FeatureKind::Float,
            FeatureKind::Float,
            FeatureKind::Integer,
            FeatureKind::Float,
        ];
        Self {
            version: Self::CURRENT_VERSION,
            columns: FEATURE_NAMES
                .iter()
                .zip(kinds)
                .map(|(name, kind)| FeatureColumn {
                    name: (*name).to_string(),
                    kind,
                })
                .collect(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names of a feature table: features, then label and session id.
    pub fn table_header(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.name.clone())
            .chain([LABEL_COLUMN.to_string(), ID_COLUMN.to_string()])
            .collect()
    }

    /// Model-side check: the features handed to a model must match its schema exactly.
    pub fn ensure_matches(&self, actual: &FeatureSchema) -> Result<()> {
        if self.names() != actual.names() {
            return Err(Error::SchemaMismatch {
                expected: owned(self.names()),
                actual: owned(actual.names()),
            });
        }
        Ok(())
    }

    /// Table-side check against the fixed schema; reordering or renaming is a schema error.
    pub fn ensure_supported(&self) -> Result<()> {
        let expected = FeatureSchema::v1();
        if self.names() != expected.names() {
            return Err(Error::Schema(format!(
                "feature columns {:?} do not match {:?}",
                self.names(),
                expected.names()
            )));
        }
        Ok(())
    }

    /// Validate a CSV header against this schema.
    pub fn validate_header<'a>(&self, header: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let got: Vec<&str> = header.into_iter().collect();
        let want = self.table_header();
        if got.len() != want.len() || got.iter().zip(&want).any(|(g, w)| g != w) {
            return Err(Error::Schema(format!(
                "feature table header {:?} does not match {:?}",
                got, want
            )));
        }
        Ok(())
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::v1()
    }
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_order() {
        assert_eq!(FeatureSchema::v1().names(), FEATURE_NAMES.to_vec());
        assert_eq!(
            FeatureSchema::v1().table_header(),
            vec!["std_speed", "max_speed", "num_points", "session_duration", "label", "session_id"]
        );
    }

    #[test]
    fn reordered_schema_mismatches() {
        let mut other = FeatureSchema::v1();
        other.columns.swap(0, 1);
        assert!(matches!(
            FeatureSchema::v1().ensure_matches(&other),
            Err(Error::SchemaMismatch { .. })
        ));
        assert!(matches!(other.ensure_supported(), Err(Error::Schema(_))));
    }

    #[test]
    fn header_validation() {
        let s = FeatureSchema::v1();
        assert!(s
            .validate_header(["std_speed", "max_speed", "num_points", "session_duration", "label", "session_id"])
            .is_ok());
        assert!(s
            .validate_header(["max_speed", "std_speed", "num_points", "session_duration", "label", "session_id"])
            .is_err());
        assert!(s.validate_header(["std_speed"]).is_err());
    }
}
