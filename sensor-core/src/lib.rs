//! Sensor Anomaly Core
//!
//! Batch anomaly detection over normalized farm sensor readings.
//!
//! ```text
//! sensor-export ─► sensor_data.csv ─► sensor-preprocess ─► preprocessed_sensor_data.csv
//!                                                                  │
//!                        ┌─────────────────────────────────────────┘
//!                        ▼
//!                 ┌────────────┐   ┌──────────────┐   ┌─────────────┐
//!                 │   loader   │──►│   detector   │──►│   explain   │
//!                 └────────────┘   └──────────────┘   └─────────────┘
//!                        └───────────── pipeline::AnomalyContext ───────┘
//! ```

pub mod constants;
pub mod detector;
pub mod error;
pub mod explain;
pub mod export;
pub mod loader;
pub mod pipeline;
pub mod preprocess;
pub mod schema;
pub mod stats;
pub mod table;

pub use detector::{AnomalyDetector, AnomalyLabel, Detection, DetectorConfig};
pub use error::{ExportError, LoadError, PreprocessError, QueryError};
pub use pipeline::{AnomalyContext, AnomalyRecord, FlaggedRow, PipelineOutcome, PipelineSummary};
pub use table::{SensorReading, SensorTable};
