use super::{load_table, read_table};
use crate::error::LoadError;
use crate::schema::{SOIL_MOISTURE_2, TEMPERATURE};
use std::fs;

const SAMPLE: &str = "\
timestamp,humidity,temperature,soil_sensor_1,soil_sensor_2,motor_status
2025-03-04 10:00:00,0.5,0.4,0.3,0.6,1
2025-03-04 10:05:00,0.55,0.45,0.35,0.65,0
";

#[test]
fn test_read_full_table() {
    let table = read_table(SAMPLE.as_bytes()).unwrap();

    assert_eq!(table.len(), 2);
    assert!(table.synthesized().is_empty());
    assert!(table.timestamp_present());

    let first = &table.rows()[0];
    assert_eq!(first.humidity(), Some(0.5));
    assert_eq!(first.temperature(), Some(0.4));
    assert_eq!(first.soil_moisture_1(), Some(0.3));
    assert_eq!(first.soil_moisture_2(), Some(0.6));
    assert_eq!(first.timestamp_string().as_deref(), Some("2025-03-04 10:00:00"));
}

#[test]
fn test_headers_are_trimmed() {
    let csv = " timestamp , humidity,temperature ,soil_sensor_1,  soil_sensor_2\n\
               2025-03-04 10:00:00,0.1,0.2,0.3,0.4\n";
    let table = read_table(csv.as_bytes()).unwrap();

    assert!(table.synthesized().is_empty());
    assert_eq!(table.rows()[0].soil_moisture_2(), Some(0.4));
}

#[test]
fn test_missing_column_is_synthesized() {
    let csv = "timestamp,humidity,temperature,soil_sensor_1\n\
               2025-03-04 10:00:00,0.1,0.2,0.3\n\
               2025-03-04 10:05:00,0.2,0.3,0.4\n\
               2025-03-04 10:10:00,0.3,0.4,0.5\n";
    let table = read_table(csv.as_bytes()).unwrap();

    assert_eq!(table.synthesized_columns(), vec!["soil_sensor_2"]);
    assert!(table
        .rows()
        .iter()
        .all(|r| r.features[SOIL_MOISTURE_2] == Some(0.0)));
}

#[test]
fn test_bad_timestamp_is_null() {
    let csv = "timestamp,humidity,temperature,soil_sensor_1,soil_sensor_2\n\
               garbage,0.1,0.2,0.3,0.4\n\
               2025-03-04 10:00:00,0.1,0.2,0.3,0.4\n";
    let table = read_table(csv.as_bytes()).unwrap();

    assert_eq!(table.len(), 2);
    assert!(table.rows()[0].timestamp.is_none());
    assert!(table.rows()[1].timestamp.is_some());
}

#[test]
fn test_missing_timestamp_column() {
    let csv = "humidity,temperature,soil_sensor_1,soil_sensor_2\n0.1,0.2,0.3,0.4\n";
    let table = read_table(csv.as_bytes()).unwrap();

    assert!(!table.timestamp_present());
    assert!(table.rows()[0].timestamp.is_none());
}

#[test]
fn test_non_numeric_cells_are_null() {
    let csv = "timestamp,humidity,temperature,soil_sensor_1,soil_sensor_2\n\
               2025-03-04 10:00:00,,abc,NaN,0.4\n";
    let table = read_table(csv.as_bytes()).unwrap();
    let row = &table.rows()[0];

    assert_eq!(row.humidity(), None);
    assert_eq!(row.features[TEMPERATURE], None);
    assert_eq!(row.soil_moisture_1(), None);
    assert_eq!(row.soil_moisture_2(), Some(0.4));
    assert_eq!(table.non_null_counts(), [0, 0, 0, 1]);
}

#[test]
fn test_header_only_is_empty_table() {
    let csv = "timestamp,humidity,temperature,soil_sensor_1,soil_sensor_2\n";
    let table = read_table(csv.as_bytes()).unwrap();

    assert!(table.is_empty());
    assert!(!table.has_feature_data());
}

#[test]
fn test_ragged_rows_are_fatal() {
    let csv = "timestamp,humidity,temperature,soil_sensor_1,soil_sensor_2\n\
               2025-03-04 10:00:00,0.1,0.2\n";
    let result = read_table(csv.as_bytes());

    assert!(matches!(result, Err(LoadError::Csv(_))));
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");

    match load_table(&path) {
        Err(LoadError::Open { path: p, .. }) => assert_eq!(p, path),
        other => panic!("Expected Open error, got {:?}", other),
    }
}

#[test]
fn test_load_from_file_leaves_source_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preprocessed_sensor_data.csv");
    fs::write(&path, SAMPLE).unwrap();

    let table = load_table(&path).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}
