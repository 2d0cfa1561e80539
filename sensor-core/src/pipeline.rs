//! Pipeline - Loader → Detector → Explainer
//!
//! Runs once at startup and produces an immutable [`AnomalyContext`].
//! Query handlers only read the context; nothing is recomputed afterwards.

use std::path::Path;

use serde::Serialize;

use crate::detector::{AnomalyDetector, DetectorConfig};
use crate::error::{LoadError, QueryError};
use crate::explain::explain;
use crate::loader::load_table;
use crate::table::{SensorTable, TableSummary};

pub const NO_DATA_MESSAGE: &str = "No data available for anomaly detection.";

/// How the detection step ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// Detector ran; `threshold` is the score cut-off
    Detected { threshold: f64 },
    /// Detection skipped; no fabricated result
    NoData { reason: String },
}

/// An anomalous row with its explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedRow {
    /// Index into the source table
    pub row_index: usize,
    pub score: f64,
    pub explanation: &'static str,
}

/// Anomaly as served to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub timestamp: Option<String>,
    pub humidity: Option<f64>,
    pub temperature: Option<f64>,
    pub soil_sensor_1: Option<f64>,
    pub soil_sensor_2: Option<f64>,
    pub explanation: String,
}

/// Diagnostics about the startup computation
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub table: TableSummary,
    pub outcome: PipelineOutcome,
    pub anomaly_count: usize,
    pub detector: DetectorConfig,
}

/// Application context computed once at process start
#[derive(Debug, Clone)]
pub struct AnomalyContext {
    table: SensorTable,
    flagged: Vec<FlaggedRow>,
    outcome: PipelineOutcome,
    detector: DetectorConfig,
}

impl AnomalyContext {
    /// Load the CSV at `path` and run detection with default parameters.
    ///
    /// A load failure is returned to the caller; the process cannot start
    /// without data.
    pub fn initialize<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let table = load_table(path)?;
        Ok(Self::build(table, &AnomalyDetector::default()))
    }

    /// Run detection and explanation over an already loaded table
    pub fn build(table: SensorTable, detector: &AnomalyDetector) -> Self {
        if table.is_empty() || !table.has_feature_data() {
            log::warn!("{}", NO_DATA_MESSAGE);
            return Self::from_parts(
                table,
                Vec::new(),
                PipelineOutcome::NoData {
                    reason: NO_DATA_MESSAGE.to_string(),
                },
                detector.config().clone(),
            );
        }

        let detection = detector.detect(&table);
        let flagged: Vec<FlaggedRow> = detection
            .labels
            .iter()
            .zip(table.rows())
            .enumerate()
            .filter(|(_, (label, _))| label.is_outlier)
            .map(|(row_index, (label, row))| FlaggedRow {
                row_index,
                score: label.score,
                explanation: explain(&row.features),
            })
            .collect();

        Self::from_parts(
            table,
            flagged,
            PipelineOutcome::Detected {
                threshold: detection.threshold,
            },
            detector.config().clone(),
        )
    }

    /// Assemble a context from precomputed parts
    pub fn from_parts(
        table: SensorTable,
        flagged: Vec<FlaggedRow>,
        outcome: PipelineOutcome,
        detector: DetectorConfig,
    ) -> Self {
        Self {
            table,
            flagged,
            outcome,
            detector,
        }
    }

    pub fn table(&self) -> &SensorTable {
        &self.table
    }

    pub fn flagged(&self) -> &[FlaggedRow] {
        &self.flagged
    }

    pub fn outcome(&self) -> &PipelineOutcome {
        &self.outcome
    }

    /// True when there is nothing to report
    pub fn is_empty(&self) -> bool {
        self.flagged.is_empty()
    }

    /// Anomalies in table order, joined back to their source rows
    pub fn anomalies(&self) -> Result<Vec<AnomalyRecord>, QueryError> {
        self.flagged
            .iter()
            .map(|flag| {
                let row = self.table.get(flag.row_index).ok_or(QueryError::RowOutOfRange {
                    index: flag.row_index,
                    rows: self.table.len(),
                })?;
                Ok(AnomalyRecord {
                    timestamp: row.timestamp_string(),
                    humidity: row.humidity(),
                    temperature: row.temperature(),
                    soil_sensor_1: row.soil_moisture_1(),
                    soil_sensor_2: row.soil_moisture_2(),
                    explanation: flag.explanation.to_string(),
                })
            })
            .collect()
    }

    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            table: TableSummary::from(&self.table),
            outcome: self.outcome.clone(),
            anomaly_count: self.flagged.len(),
            detector: self.detector.clone(),
        }
    }
}
