//! Data Loader
//!
//! Reads the preprocessed sensor CSV into a [`SensorTable`].
//!
//! - Column names are trimmed.
//! - Feature columns absent from the header are synthesized with
//!   [`MISSING_COLUMN_DEFAULT`] and reported on the table.
//! - Empty or non-numeric feature cells load as null.
//! - Failing to open or parse the file is fatal for the caller.

mod timestamp;

#[cfg(test)]
mod tests;

pub use timestamp::parse_timestamp;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::LoadError;
use crate::schema::{FEATURES, FEATURE_COUNT, MISSING_COLUMN_DEFAULT, TIMESTAMP_COLUMN};
use crate::table::{SensorReading, SensorTable};

/// Load the sensor table from a CSV file
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<SensorTable, LoadError> {
    let path = path.as_ref();
    log::info!("Loading sensor data from {}", path.display());

    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_table(BufReader::new(file))?;
    log::info!("Sensor data loaded: {} rows", table.len());
    Ok(table)
}

/// Read the sensor table from any CSV source
pub fn read_table<R: Read>(reader: R) -> Result<SensorTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let timestamp_idx = position(TIMESTAMP_COLUMN);
    if timestamp_idx.is_none() {
        log::warn!("No '{}' column, all timestamps will be null", TIMESTAMP_COLUMN);
    }

    let mut columns: [Option<usize>; FEATURE_COUNT] = [None; FEATURE_COUNT];
    let mut synthesized = Vec::new();
    for (i, feature) in FEATURES.iter().enumerate() {
        columns[i] = position(feature.column);
        if columns[i].is_none() {
            synthesized.push(*feature);
        }
    }

    if !synthesized.is_empty() {
        let names: Vec<&str> = synthesized.iter().map(|f| f.column).collect();
        log::warn!(
            "Missing columns {:?}, filled with {}",
            names,
            MISSING_COLUMN_DEFAULT
        );
    }

    let mut rows = Vec::new();
    let mut bad_timestamps = 0usize;

    for result in csv_reader.records() {
        let record = result?;

        let timestamp = match timestamp_idx {
            Some(idx) => {
                let parsed = record.get(idx).and_then(parse_timestamp);
                if parsed.is_none() {
                    bad_timestamps += 1;
                }
                parsed
            }
            None => None,
        };

        let mut features = [None; FEATURE_COUNT];
        for (i, column) in columns.iter().enumerate() {
            features[i] = match column {
                Some(idx) => record.get(*idx).and_then(parse_number),
                None => Some(MISSING_COLUMN_DEFAULT),
            };
        }

        rows.push(SensorReading::new(timestamp, features));
    }

    if timestamp_idx.is_some() && bad_timestamps > 0 {
        log::warn!("{} rows have an unparsable timestamp", bad_timestamps);
    }

    Ok(SensorTable::new(rows, synthesized, timestamp_idx.is_some()))
}

/// Parse a numeric cell, `None` for empty or non-finite values
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
