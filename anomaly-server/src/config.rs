//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use sensor_core::constants::DEFAULT_PREPROCESSED_DATA_PATH;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Preprocessed sensor CSV loaded at startup
    pub data_path: PathBuf,

    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_PREPROCESSED_DATA_PATH),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5004,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_path: env::var("SENSOR_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),

            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
