//! Central Configuration Constants
//!
//! Defaults for file locations and the Firebase export, with helpers that
//! read an environment override first.

/// Raw export written by `sensor-export`
pub const DEFAULT_RAW_DATA_PATH: &str = "sensor_data.csv";

/// Normalized table written by `sensor-preprocess` and read by the server
pub const DEFAULT_PREPROCESSED_DATA_PATH: &str = "preprocessed_sensor_data.csv";

/// Node under which the readings are stored
pub const DEFAULT_FIREBASE_NODE: &str = "sensor_data";

/// HTTP timeout for the export (seconds)
pub const DEFAULT_EXPORT_TIMEOUT: u64 = 30;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Database secret or ID token appended as `auth=`
pub fn get_firebase_auth_token() -> Option<String> {
    std::env::var("FIREBASE_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Node to export
pub fn get_firebase_node() -> String {
    std::env::var("FIREBASE_SENSOR_NODE")
        .unwrap_or_else(|_| DEFAULT_FIREBASE_NODE.to_string())
}

/// Export timeout
pub fn get_export_timeout() -> u64 {
    std::env::var("FIREBASE_TIMEOUT_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_EXPORT_TIMEOUT)
}
