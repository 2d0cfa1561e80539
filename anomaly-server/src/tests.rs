//! Router tests against injected contexts

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use sensor_core::loader::read_table;
use sensor_core::{AnomalyContext, AnomalyDetector, DetectorConfig, FlaggedRow, PipelineOutcome, SensorTable};

use crate::config::Config;
use crate::{create_router, AppState};

fn state_with(context: AnomalyContext) -> AppState {
    AppState {
        context: Arc::new(context),
        config: Config::default(),
    }
}

async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
    let response = create_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// 99 clustered readings followed by one extreme reading
fn dataset() -> String {
    let mut csv = String::from("timestamp,humidity,temperature,soil_sensor_1,soil_sensor_2\n");
    for i in 0..99 {
        let a = ((i * 37) % 100) as f64 / 1000.0;
        let b = ((i * 53) % 100) as f64 / 1000.0;
        csv.push_str(&format!(
            "2025-03-04 {:02}:{:02}:00,{},{},{},{}\n",
            i / 60,
            i % 60,
            0.45 + a,
            0.45 + b,
            0.5 - a,
            0.5 - b
        ));
    }
    csv.push_str("2025-03-04 02:00:00,0.5,0.85,0.95,0.5\n");
    csv
}

fn detected_context() -> AnomalyContext {
    let table = read_table(dataset().as_bytes()).unwrap();
    AnomalyContext::build(table, &AnomalyDetector::default())
}

#[tokio::test]
async fn test_anomalies_listed_in_order() {
    let (status, body) = get_json(state_with(detected_context()), "/anomalies").await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert!(!records.is_empty());
    assert!(records.len() <= 5);

    let last = records.last().unwrap();
    assert_eq!(last["timestamp"], "2025-03-04 02:00:00");
    assert_eq!(last["soil_sensor_1"], 0.95);
    assert_eq!(last["temperature"], 0.85);
    assert_eq!(last["explanation"], "Sudden spike in soil moisture detected.");

    let timestamps: Vec<&str> = records.iter().map(|r| r["timestamp"].as_str().unwrap()).collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(timestamps, sorted);
}

#[tokio::test]
async fn test_record_fields() {
    let (_, body) = get_json(state_with(detected_context()), "/anomalies").await;
    let record = body[0].as_object().unwrap();

    for field in ["timestamp", "humidity", "temperature", "soil_sensor_1", "soil_sensor_2", "explanation"] {
        assert!(record.contains_key(field), "missing {}", field);
    }
    assert_eq!(record.len(), 6);
}

#[tokio::test]
async fn test_empty_set_is_not_found() {
    let context = AnomalyContext::build(SensorTable::default(), &AnomalyDetector::default());
    let (status, body) = get_json(state_with(context), "/anomalies").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No anomalies detected");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_zero_flagged_is_not_found() {
    let table = read_table(dataset().as_bytes()).unwrap();
    let detector = AnomalyDetector::new(DetectorConfig {
        contamination: 0.0,
        ..Default::default()
    });
    let (status, _) = get_json(state_with(AnomalyContext::build(table, &detector)), "/anomalies").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_broken_context_is_server_error() {
    let context = AnomalyContext::from_parts(
        SensorTable::default(),
        vec![FlaggedRow {
            row_index: 7,
            score: 0.8,
            explanation: "Humidity levels too low.",
        }],
        PipelineOutcome::Detected { threshold: 0.6 },
        DetectorConfig::default(),
    );
    let (status, body) = get_json(state_with(context), "/anomalies").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch anomalies:"));
}

#[tokio::test]
async fn test_status_reports_no_data() {
    let context = AnomalyContext::build(SensorTable::default(), &AnomalyDetector::default());
    let (status, body) = get_json(state_with(context), "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["state"], "no_data");
    assert_eq!(body["anomaly_count"], 0);
    assert_eq!(body["detector"]["n_estimators"], 100);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(state_with(detected_context()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["rows_loaded"], 100);
    assert_eq!(body["environment"], "development");
    assert!(body["timestamp"].is_i64());
}
