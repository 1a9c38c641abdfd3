#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pollution prediction heatmap generator.
//!
//! Turns a rectangular grid of integer predictions into a `GeoJSON`
//! `FeatureCollection` with one colored polygon per cell. The pipeline is a
//! straight line:
//!
//! 1. [`grid::load_grid`] reads and validates the input file.
//! 2. [`lattice::CornerLattice::compute`] interpolates the shared cell
//!    corners across the configured bounding box in exact decimals.
//! 3. [`assemble::assemble`] classifies every value into a
//!    [`SeverityBand`](pollution_heatmap_models::SeverityBand) and builds
//!    the cell polygons.
//! 4. [`output::write_geojson`] writes the document.

pub mod assemble;
pub mod config;
pub mod grid;
pub mod lattice;
pub mod output;

use std::path::{Path, PathBuf};

use geojson::FeatureCollection;
use pollution_heatmap_models::PredictionGrid;

use crate::assemble::AssembleError;
use crate::config::{ConfigError, HeatmapConfig};
use crate::grid::GridError;
use crate::lattice::{CornerLattice, LatticeError};
use crate::output::OutputError;

/// Any failure of the heatmap pipeline.
#[derive(Debug, thiserror::Error)]
pub enum HeatmapError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input grid could not be loaded.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The corner lattice could not be computed.
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// Features could not be assembled.
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    /// The output document could not be produced.
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl HeatmapError {
    /// Whether the failure happened while writing the output file.
    #[must_use]
    pub const fn is_write_failure(&self) -> bool {
        matches!(self, Self::Output(OutputError::Write { .. }))
    }
}

/// Builds the heatmap feature collection for an already loaded grid.
///
/// # Errors
///
/// Returns an error if the lattice cannot be computed or a value cannot be
/// classified.
pub fn build_heatmap(
    grid: &PredictionGrid,
    config: &HeatmapConfig,
) -> Result<FeatureCollection, HeatmapError> {
    let lattice = CornerLattice::compute(&config.bounds, config.dimensions)?;
    Ok(assemble::assemble(grid, &lattice, config.opacity)?)
}

/// Runs the full pipeline: load `input`, build the heatmap, and write it to
/// the configured output path. Returns the path written.
///
/// Nothing is written unless every earlier stage succeeds.
///
/// # Errors
///
/// Returns an error if any stage fails.
pub fn run(input: &Path, config: &HeatmapConfig) -> Result<PathBuf, HeatmapError> {
    let grid = grid::load_grid(input, config.dimensions)?;
    let collection = build_heatmap(&grid, config)?;
    output::write_geojson(&config.output_path, &collection)?;
    Ok(config.output_path.clone())
}
