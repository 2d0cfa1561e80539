//! Preprocessing - raw sensor export → normalized table
//!
//! Produces the file the loader expects:
//! 1. Timestamps are parsed, invalid values become empty.
//! 2. `%` signs are stripped from the numeric columns, which are then parsed.
//! 3. Nulls in numeric columns are filled with the column median.
//! 4. `motor_status` (On/Off) and `flame_detected` (Yes/No) become 1/0.
//! 5. Numeric columns are min-max scaled to [0, 1].

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::PreprocessError;
use crate::loader::{parse_number, parse_timestamp};
use crate::schema::{FEATURES, FEATURE_COUNT, TIMESTAMP_COLUMN};
use crate::stats;
use crate::table::TIMESTAMP_FORMAT;

pub const MOTOR_STATUS_COLUMN: &str = "motor_status";
pub const FLAME_DETECTED_COLUMN: &str = "flame_detected";

/// Scaling applied to one numeric column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnScale {
    pub column: &'static str,
    /// Observed range before scaling, `None` if the column had no values
    pub range: Option<(f64, f64)>,
    /// Cells filled with the median
    pub filled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScalingSummary {
    pub rows: usize,
    pub invalid_timestamps: usize,
    pub columns: Vec<ColumnScale>,
}

/// Preprocess `input` into `output`
///
/// Output goes to a temporary file next to `output` and replaces it only
/// once the whole input has been processed; a failed run leaves any
/// previous output in place.
pub fn preprocess_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<ScalingSummary, PreprocessError> {
    let output = output.as_ref();
    let reader = BufReader::new(File::open(input)?);

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = NamedTempFile::new_in(dir)?;
    let summary = {
        let mut writer = BufWriter::new(staged.as_file());
        let summary = preprocess(reader, &mut writer)?;
        writer.flush()?;
        summary
    };
    staged.persist(output).map_err(|e| e.error)?;
    Ok(summary)
}

/// Preprocess a raw CSV stream into a normalized CSV stream
pub fn preprocess<R: Read, W: Write>(reader: R, writer: W) -> Result<ScalingSummary, PreprocessError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let timestamp_idx = position(TIMESTAMP_COLUMN).ok_or(PreprocessError::MissingColumn(TIMESTAMP_COLUMN))?;
    let mut numeric_idx = [0usize; FEATURE_COUNT];
    for (i, feature) in FEATURES.iter().enumerate() {
        numeric_idx[i] = position(feature.column).ok_or(PreprocessError::MissingColumn(feature.column))?;
    }
    let motor_idx = position(MOTOR_STATUS_COLUMN);
    let flame_idx = position(FLAME_DETECTED_COLUMN);

    let mut timestamps = Vec::new();
    let mut columns: [Vec<Option<f64>>; FEATURE_COUNT] = Default::default();
    let mut motor = Vec::new();
    let mut flame = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        timestamps.push(record.get(timestamp_idx).and_then(parse_timestamp));
        for (i, idx) in numeric_idx.iter().enumerate() {
            columns[i].push(record.get(*idx).and_then(parse_percent));
        }
        motor.push(motor_idx.and_then(|i| record.get(i)).and_then(|v| map_flag(v, "On", "Off")));
        flame.push(flame_idx.and_then(|i| record.get(i)).and_then(|v| map_flag(v, "Yes", "No")));
    }

    let mut scales = Vec::with_capacity(FEATURE_COUNT);
    for (i, values) in columns.iter_mut().enumerate() {
        let filled = fill_median(values);
        let range = min_max_scale(values);
        scales.push(ColumnScale {
            column: FEATURES[i].column,
            range,
            filled,
        });
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut header = vec![TIMESTAMP_COLUMN];
    header.extend(FEATURES.iter().map(|f| f.column));
    header.push(MOTOR_STATUS_COLUMN);
    header.push(FLAME_DETECTED_COLUMN);
    csv_writer.write_record(&header)?;

    for row in 0..timestamps.len() {
        let mut out = Vec::with_capacity(header.len());
        out.push(
            timestamps[row]
                .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
        );
        for column in &columns {
            out.push(format_cell(column[row]));
        }
        out.push(motor[row].map(|v| v.to_string()).unwrap_or_default());
        out.push(flame[row].map(|v| v.to_string()).unwrap_or_default());
        csv_writer.write_record(&out)?;
    }
    csv_writer.flush()?;

    let summary = ScalingSummary {
        rows: timestamps.len(),
        invalid_timestamps: timestamps.iter().filter(|t| t.is_none()).count(),
        columns: scales,
    };
    log::info!(
        "Preprocessed {} rows ({} invalid timestamps)",
        summary.rows,
        summary.invalid_timestamps
    );
    Ok(summary)
}

/// Numeric cell that may carry a percent sign
fn parse_percent(raw: &str) -> Option<f64> {
    parse_number(&raw.replace('%', ""))
}

fn map_flag(raw: &str, one: &str, zero: &str) -> Option<u8> {
    match raw.trim() {
        v if v == one => Some(1),
        v if v == zero => Some(0),
        _ => None,
    }
}

/// Replace nulls with the column median, returns the number of cells filled
fn fill_median(values: &mut [Option<f64>]) -> usize {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let Some(median) = stats::median(&present) else {
        return 0;
    };
    let mut filled = 0;
    for value in values.iter_mut().filter(|v| v.is_none()) {
        *value = Some(median);
        filled += 1;
    }
    filled
}

/// Scale to [0, 1] in place, a constant column scales to 0
fn min_max_scale(values: &mut [Option<f64>]) -> Option<(f64, f64)> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let (min, max) = stats::min_max(&present)?;
    // Halved so that spans wider than f64::MAX stay finite
    let half_span = max / 2.0 - min / 2.0;
    for value in values.iter_mut().flatten() {
        *value = if half_span > 0.0 {
            (*value / 2.0 - min / 2.0) / half_span
        } else {
            0.0
        };
    }
    Some((min, max))
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
