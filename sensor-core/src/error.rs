//! Error types for the pipeline stages

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure while loading the sensor table
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure while serving the computed anomaly set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("anomaly row {index} is outside the table ({rows} rows)")]
    RowOutOfRange { index: usize, rows: usize },
}

/// Failure in the preprocessing stage
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("raw export has no '{0}' column")]
    MissingColumn(&'static str),
}

/// Failure in the remote sensor export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("database returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected payload: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
