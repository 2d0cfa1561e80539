//! Feature Layout - Centralized Feature Definition
//!
//! Controls which columns the detector reads and in which order.
//!
//! ## Rules:
//! 1. The order of `FEATURES` is the column order of the feature matrix.
//! 2. `column` is the header as stored in the CSV, `name` is the semantic name.
//! 3. Explanation thresholds assume every feature is min-max scaled to [0, 1].

use serde::Serialize;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Number of features fed to the detector
pub const FEATURE_COUNT: usize = 4;

/// Header of the timestamp column
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Value written into a feature column that is absent from the source
pub const MISSING_COLUMN_DEFAULT: f64 = 0.0;

/// One detector feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureSpec {
    /// Semantic name used in code and diagnostics
    pub name: &'static str,
    /// Header in the CSV file
    pub column: &'static str,
}

/// Feature layout in matrix order
pub const FEATURES: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec { name: "humidity", column: "humidity" },
    FeatureSpec { name: "temperature", column: "temperature" },
    FeatureSpec { name: "soil_moisture_1", column: "soil_sensor_1" },
    FeatureSpec { name: "soil_moisture_2", column: "soil_sensor_2" },
];

/// Matrix index of each feature
pub const HUMIDITY: usize = 0;
pub const TEMPERATURE: usize = 1;
pub const SOIL_MOISTURE_1: usize = 2;
pub const SOIL_MOISTURE_2: usize = 3;

/// Stored column names in matrix order
pub fn feature_columns() -> [&'static str; FEATURE_COUNT] {
    FEATURES.map(|f| f.column)
}

/// Find the matrix index for a stored column name
pub fn feature_index(column: &str) -> Option<usize> {
    FEATURES.iter().position(|f| f.column == column)
}
