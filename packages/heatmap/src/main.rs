#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the pollution heatmap generator.
//!
//! Reads a grid of comma-separated predictions and writes a colored
//! `GeoJSON` heatmap (by default `heatmap.geojson` in the working
//! directory). Set `HEATMAP_CONFIG` to use a different grid size, bounding
//! box, or output path.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pollution_heatmap::HeatmapError;
use pollution_heatmap::config::HeatmapConfig;

#[derive(Parser)]
#[command(
    name = "pollution_heatmap",
    about = "Convert a pollution prediction grid into a GeoJSON heatmap",
    version
)]
struct Cli {
    /// Path to the prediction grid: one line per row, comma-separated integers
    input: PathBuf,
}

fn main() -> ExitCode {
    pollution_heatmap_cli_utils::init_logger();
    let cli = Cli::parse();

    match generate(&cli.input) {
        Ok(path) => {
            log::info!("Heatmap written to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            if e.is_write_failure() {
                log::error!("Heatmap could not be saved");
            }
            pollution_heatmap_cli_utils::report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn generate(input: &Path) -> Result<PathBuf, HeatmapError> {
    let config = HeatmapConfig::load()?;
    pollution_heatmap::run(input, &config)
}
