//! Anomaly Detector
//!
//! Fits an isolation forest on the four-feature matrix and labels every row.
//! The forest is seeded, so the same table always yields the same labels.

pub mod isolation_forest;


use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::schema::FEATURE_COUNT;
use crate::stats;
use crate::table::SensorTable;
pub use isolation_forest::{FeatureRow, IsolationForest};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Detector parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Number of trees in the forest
    pub n_estimators: usize,

    /// Expected fraction of outliers (0.0 - 0.5)
    pub contamination: f64,

    /// Sub-sample size per tree (capped by the row count)
    pub max_samples: usize,

    /// RNG seed
    pub seed: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            contamination: 0.05,
            max_samples: 256,
            seed: 42,
        }
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Label of one row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyLabel {
    pub is_outlier: bool,
    pub score: f64,
}

/// Labels for a whole table, in row order
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub labels: Vec<AnomalyLabel>,
    pub threshold: f64,
}

impl Detection {
    /// Row indices of outliers, ascending
    pub fn outlier_indices(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.is_outlier)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn outlier_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_outlier).count()
    }
}

// ============================================================================
// DETECTOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Label every row of the table.
    ///
    /// Null cells are imputed with their column median for fitting; callers
    /// must ensure the table has at least one non-null feature value.
    pub fn detect(&self, table: &SensorTable) -> Detection {
        let matrix = feature_matrix(table);

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let forest = IsolationForest::fit(
            &matrix,
            self.config.n_estimators,
            self.config.max_samples,
            &mut rng,
        );
        let scores = forest.score_all(&matrix);

        let contamination = self.config.contamination.clamp(0.0, 0.5);
        let threshold = stats::quantile(&scores, 1.0 - contamination).unwrap_or(f64::NAN);

        let labels: Vec<AnomalyLabel> = scores
            .iter()
            .map(|&score| AnomalyLabel {
                is_outlier: score > threshold,
                score,
            })
            .collect();

        let detection = Detection { labels, threshold };
        log::info!(
            "Isolation forest: {} of {} rows flagged (threshold {:.4})",
            detection.outlier_count(),
            matrix.len(),
            threshold
        );
        detection
    }
}

/// Dense feature matrix with nulls replaced by the column median
pub fn feature_matrix(table: &SensorTable) -> Vec<FeatureRow> {
    let mut medians = [0.0; FEATURE_COUNT];
    for (col, median) in medians.iter_mut().enumerate() {
        let values: Vec<f64> = table.rows().iter().filter_map(|r| r.features[col]).collect();
        *median = stats::median(&values).unwrap_or(0.0);
    }

    table
        .rows()
        .iter()
        .map(|row| {
            let mut out = [0.0; FEATURE_COUNT];
            for (col, value) in row.features.iter().enumerate() {
                out[col] = value.unwrap_or(medians[col]);
            }
            out
        })
        .collect()
}
