//! Export sensor readings from Firebase to a raw CSV file
//!
//! ```text
//! FIREBASE_DATABASE_URL=https://<db>.firebaseio.com cargo run --bin sensor-export
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sensor_core::constants;
use sensor_core::export::{write_csv_file, FirebaseConfig, FirebaseExporter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Export sensor readings from Firebase")]
struct Args {
    /// Realtime Database URL
    #[arg(long, env = "FIREBASE_DATABASE_URL")]
    database_url: String,

    /// Node holding the readings
    #[arg(long, default_value = constants::DEFAULT_FIREBASE_NODE)]
    node: String,

    /// Output CSV
    #[arg(long, short, default_value = constants::DEFAULT_RAW_DATA_PATH)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = FirebaseConfig {
        node: args.node,
        ..FirebaseConfig::new(args.database_url)
    };

    let exporter = FirebaseExporter::new(config)?;
    let readings = exporter.fetch().await.context("failed to fetch sensor data")?;

    write_csv_file(&readings, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    log::info!("Sensor data saved to {}", args.output.display());
    Ok(())
}
