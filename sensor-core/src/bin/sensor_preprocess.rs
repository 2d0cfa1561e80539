//! Clean and normalize a raw sensor export for anomaly detection

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sensor_core::constants;
use sensor_core::preprocess::preprocess_file;

#[derive(Parser, Debug)]
#[command(author, version, about = "Normalize raw sensor readings")]
struct Args {
    /// Raw CSV from sensor-export
    #[arg(long, short, default_value = constants::DEFAULT_RAW_DATA_PATH)]
    input: PathBuf,

    /// Normalized CSV for the anomaly server
    #[arg(long, short, default_value = constants::DEFAULT_PREPROCESSED_DATA_PATH)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let summary = preprocess_file(&args.input, &args.output)
        .with_context(|| format!("failed to preprocess {}", args.input.display()))?;

    for column in &summary.columns {
        match column.range {
            Some((min, max)) => log::info!(
                "{}: range [{}, {}], {} cells filled with median",
                column.column,
                min,
                max,
                column.filled
            ),
            None => log::warn!("{}: no numeric values", column.column),
        }
    }
    log::info!("Preprocessed data saved to {}", args.output.display());
    Ok(())
}
