//! Feature table: one row per session plus the CSV interchange format.

use crate::error::{Error, Result};
use crate::features::{FeatureSchema, FeatureVector};
use crate::storage;
use ndarray::Array2;
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub features: FeatureVector,
    /// 0 human, 1 bot
    pub label: u8,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    schema: FeatureSchema,
    rows: Vec<FeatureRow>,
}

#[derive(Deserialize)]
struct CsvRecord {
    std_speed: f64,
    max_speed: f64,
    num_points: usize,
    session_duration: f64,
    label: u8,
    session_id: String,
}

impl FeatureTable {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(rows: Vec<FeatureRow>) -> Self {
        Self {
            schema: FeatureSchema::v1(),
            rows,
        }
    }

    pub fn push(&mut self, row: FeatureRow) {
        self.rows.push(row);
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> Vec<u8> {
        self.rows.iter().map(|r| r.label).collect()
    }

    /// Row counts as `[human, bot]`.
    pub fn class_counts(&self) -> [usize; 2] {
        let bots = self.rows.iter().filter(|r| r.label == 1).count();
        [self.rows.len() - bots, bots]
    }

    /// Model input matrix, `rows × features`, columns in schema order.
    pub fn matrix(&self) -> Array2<f64> {
        let width = self.schema.len();
        let mut data = Vec::with_capacity(self.rows.len() * width);
        for row in &self.rows {
            data.extend_from_slice(&row.features.to_array()[..width]);
        }
        Array2::from_shape_vec((self.rows.len(), width), data)
            .unwrap_or_else(|_| Array2::zeros((0, width)))
    }

    /// Rows at `indices`, in the given order.
    pub fn subset(&self, indices: &[usize]) -> FeatureTable {
        FeatureTable {
            schema: self.schema.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Fixed-schema and label checks applied at every boundary crossing.
    pub fn validate(&self) -> Result<()> {
        self.schema.ensure_supported()?;
        if let Some(bad) = self.rows.iter().find(|r| r.label > 1) {
            return Err(Error::Schema(format!(
                "session {}: label must be 0 or 1, got {}",
                bad.session_id, bad.label
            )));
        }
        Ok(())
    }

    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(w);
        wtr.write_record(self.schema.table_header())?;
        for row in &self.rows {
            let f = &row.features;
            wtr.write_record([
                format_float(f.std_speed),
                format_float(f.max_speed),
                f.num_points.to_string(),
                format_float(f.session_duration),
                row.label.to_string(),
                row.session_id.clone(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn read_csv<R: Read>(r: R) -> Result<Self> {
        let schema = FeatureSchema::v1();
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(r);
        schema.validate_header(rdr.headers()?.iter())?;

        let mut table = FeatureTable::new(schema);
        for record in rdr.deserialize::<CsvRecord>() {
            let rec = record?;
            table.push(FeatureRow {
                features: FeatureVector {
                    std_speed: rec.std_speed,
                    max_speed: rec.max_speed,
                    num_points: rec.num_points,
                    session_duration: rec.session_duration,
                },
                label: rec.label,
                session_id: rec.session_id,
            });
        }
        table.validate()?;
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        storage::write_atomic(path, &buf)?;
        tracing::info!(path = %path.display(), rows = self.len(), "feature table saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = storage::read_artifact(path)?;
        let table = Self::read_csv(bytes.as_slice())?;
        tracing::info!(path = %path.display(), rows = table.len(), "feature table loaded");
        Ok(table)
    }
}

/// Shortest representation that parses back to the same `f64`, padded with zeros
/// to at least three fractional digits.
fn format_float(v: f64) -> String {
    let mut out = v.to_string();
    if !v.is_finite() {
        return out;
    }
    let fraction = match out.find('.') {
        Some(dot) => out.len() - dot - 1,
        None => {
            out.push('.');
            0
        }
    };
    for _ in fraction..3 {
        out.push('0');
    }
    out
}
