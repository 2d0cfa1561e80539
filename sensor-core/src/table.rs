//! Validated sensor table
//!
//! Output of the loader. Every feature column of the layout is present,
//! either read from the source or synthesized.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::schema::{FeatureSpec, FEATURE_COUNT, HUMIDITY, SOIL_MOISTURE_1, SOIL_MOISTURE_2, TEMPERATURE};

/// Timestamp layout used when a reading is rendered as text
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// `None` when the source value could not be parsed
    pub timestamp: Option<NaiveDateTime>,
    /// Feature values in layout order, `None` for empty or non-numeric cells
    pub features: [Option<f64>; FEATURE_COUNT],
}

impl SensorReading {
    pub fn new(timestamp: Option<NaiveDateTime>, features: [Option<f64>; FEATURE_COUNT]) -> Self {
        Self { timestamp, features }
    }

    pub fn humidity(&self) -> Option<f64> {
        self.features[HUMIDITY]
    }

    pub fn temperature(&self) -> Option<f64> {
        self.features[TEMPERATURE]
    }

    pub fn soil_moisture_1(&self) -> Option<f64> {
        self.features[SOIL_MOISTURE_1]
    }

    pub fn soil_moisture_2(&self) -> Option<f64> {
        self.features[SOIL_MOISTURE_2]
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`]
    pub fn timestamp_string(&self) -> Option<String> {
        self.timestamp.map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
    }

    /// True if at least one feature holds a value
    pub fn has_features(&self) -> bool {
        self.features.iter().any(Option::is_some)
    }
}

/// In-memory table of readings
#[derive(Debug, Clone, Default)]
pub struct SensorTable {
    rows: Vec<SensorReading>,
    synthesized: Vec<FeatureSpec>,
    timestamp_present: bool,
}

impl SensorTable {
    pub fn new(rows: Vec<SensorReading>, synthesized: Vec<FeatureSpec>, timestamp_present: bool) -> Self {
        Self {
            rows,
            synthesized,
            timestamp_present,
        }
    }

    /// Table built in code, every column considered present
    pub fn from_rows(rows: Vec<SensorReading>) -> Self {
        Self::new(rows, Vec::new(), true)
    }

    pub fn rows(&self) -> &[SensorReading] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&SensorReading> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Feature columns filled with the default because the source lacked them
    pub fn synthesized(&self) -> &[FeatureSpec] {
        &self.synthesized
    }

    pub fn timestamp_present(&self) -> bool {
        self.timestamp_present
    }

    /// True if any feature cell of any row holds a value
    pub fn has_feature_data(&self) -> bool {
        self.rows.iter().any(SensorReading::has_features)
    }

    /// Per-column count of non-null cells
    pub fn non_null_counts(&self) -> [usize; FEATURE_COUNT] {
        let mut counts = [0usize; FEATURE_COUNT];
        for row in &self.rows {
            for (i, value) in row.features.iter().enumerate() {
                if value.is_some() {
                    counts[i] += 1;
                }
            }
        }
        counts
    }

    /// Names of the synthesized columns as stored in the CSV
    pub fn synthesized_columns(&self) -> Vec<&'static str> {
        self.synthesized.iter().map(|f| f.column).collect()
    }
}

/// Summary of a loaded table for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub rows: usize,
    pub synthesized_columns: Vec<&'static str>,
    pub timestamp_column: bool,
    pub non_null: [usize; FEATURE_COUNT],
}

impl From<&SensorTable> for TableSummary {
    fn from(table: &SensorTable) -> Self {
        Self {
            rows: table.len(),
            synthesized_columns: table.synthesized_columns(),
            timestamp_column: table.timestamp_present(),
            non_null: table.non_null_counts(),
        }
    }
}
