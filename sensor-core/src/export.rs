//! Sensor Export - Firebase Realtime Database → raw CSV
//!
//! Pulls the reading node over the database REST API and writes one CSV row
//! per pushed record. Values are copied as text; cleaning is left to
//! [`crate::preprocess`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use serde_json::Value;

use crate::constants;
use crate::error::ExportError;

pub const EXPORT_COLUMN_COUNT: usize = 7;

/// Columns of the raw export, in file order
pub const EXPORT_COLUMNS: [&str; EXPORT_COLUMN_COUNT] = [
    "timestamp",
    "humidity",
    "temperature",
    "soil_sensor_1",
    "soil_sensor_2",
    "motor_status",
    "flame_detected",
];

/// Firebase connection settings
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub database_url: String,
    pub node: String,
    pub auth_token: Option<String>,
    pub timeout_seconds: u64,
}

impl FirebaseConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            node: constants::get_firebase_node(),
            auth_token: constants::get_firebase_auth_token(),
            timeout_seconds: constants::get_export_timeout(),
        }
    }

    /// REST endpoint of the node
    pub fn node_url(&self) -> String {
        format!(
            "{}/{}.json",
            self.database_url.trim_end_matches('/'),
            self.node.trim_matches('/')
        )
    }
}

/// One exported record
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    /// Push id of the record
    pub key: String,
    /// Cell text per [`EXPORT_COLUMNS`], empty when the field is missing
    pub values: [String; EXPORT_COLUMN_COUNT],
}

/// HTTP client for the sensor node
pub struct FirebaseExporter {
    config: FirebaseConfig,
    http_client: reqwest::Client,
}

impl FirebaseExporter {
    pub fn new(config: FirebaseConfig) -> Result<Self, ExportError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, http_client })
    }

    /// Fetch every record under the node
    pub async fn fetch(&self) -> Result<Vec<RawReading>, ExportError> {
        let url = self.config.node_url();
        log::info!("Fetching sensor data from {}", url);

        let mut request = self.http_client.get(&url);
        if let Some(token) = &self.config.auth_token {
            request = request.query(&[("auth", token)]);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let readings = read_response(status, &body)?;
        log::info!("Fetched {} sensor records", readings.len());
        Ok(readings)
    }
}

/// Interpret a node response from its HTTP status and body
pub fn read_response(status: u16, body: &str) -> Result<Vec<RawReading>, ExportError> {
    if !(200..300).contains(&status) {
        log::error!("Export failed ({}): {}", status, body);
        return Err(ExportError::Status {
            status,
            body: body.to_string(),
        });
    }

    let snapshot: Value = serde_json::from_str(body).map_err(|e| ExportError::Decode(e.to_string()))?;
    parse_snapshot(snapshot)
}

/// Convert a node snapshot into readings ordered by key
pub fn parse_snapshot(snapshot: Value) -> Result<Vec<RawReading>, ExportError> {
    let entries: Vec<(String, Value)> = match snapshot {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map.into_iter().collect(),
        // Integer keys come back as an array with holes
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (format!("{:08}", i), v))
            .collect(),
        other => {
            return Err(ExportError::Decode(format!(
                "expected an object of records, got {}",
                type_name(&other)
            )))
        }
    };

    let mut readings = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let Value::Object(fields) = value else {
            log::warn!("Skipping record {}: not an object", key);
            continue;
        };
        let values = EXPORT_COLUMNS.map(|column| fields.get(column).map(cell_text).unwrap_or_default());
        readings.push(RawReading { key, values });
    }

    readings.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(readings)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Write readings as CSV with a header row
pub fn write_csv<W: Write>(readings: &[RawReading], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_COLUMNS)?;
    for reading in readings {
        csv_writer.write_record(&reading.values)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file<P: AsRef<Path>>(readings: &[RawReading], path: P) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(readings, BufWriter::new(file))
}
