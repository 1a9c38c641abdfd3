//! Prediction grid loader.
//!
//! The input is headerless CSV: one line per grid row, one integer per
//! column, optionally padded with whitespace. Line and value counts must
//! match the configured dimensions exactly; nothing is truncated or padded.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use pollution_heatmap_models::{GridDimensions, GridShapeError, PredictionGrid};

/// Errors that can occur while loading the prediction grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The input file could not be opened.
    #[error("cannot open input grid {}: {source}", .path.display())]
    InputNotFound {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The CSV reader failed (I/O or encoding).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A token is not an integer.
    #[error("line {line}, value {column}: '{token}' is not an integer")]
    MalformedValue {
        /// One-based line number in the input.
        line: u64,
        /// One-based position of the value within the line.
        column: usize,
        /// The offending text, trimmed.
        token: String,
    },

    /// A line has the wrong number of values.
    #[error("line {line} has {actual} values, expected {expected}")]
    ColumnCountMismatch {
        /// One-based line number in the input.
        line: u64,
        /// Configured number of columns.
        expected: usize,
        /// Number of values found on the line.
        actual: usize,
    },

    /// The file has the wrong number of lines.
    #[error("input has {actual} rows, expected {expected}")]
    RowCountMismatch {
        /// Configured number of rows.
        expected: usize,
        /// Number of rows found.
        actual: usize,
    },

    /// The rows do not form a rectangular grid.
    #[error("invalid grid shape: {0}")]
    Shape(#[from] GridShapeError),
}

/// Opens `path` and parses it as a grid of `dimensions`.
///
/// The file handle is released before this returns.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a value is not an integer,
/// or the line/value counts differ from `dimensions`.
pub fn load_grid(path: &Path, dimensions: GridDimensions) -> Result<PredictionGrid, GridError> {
    let file = File::open(path).map_err(|source| GridError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let grid = parse_grid(file, dimensions)?;
    log::info!(
        "Loaded {} prediction grid from {}",
        grid.dimensions(),
        path.display()
    );
    Ok(grid)
}

/// Parses a grid of `dimensions` from any reader.
///
/// Blank and whitespace-only lines are skipped.
///
/// # Errors
///
/// Returns an error if a value is not an integer or the line/value counts
/// differ from `dimensions`.
pub fn parse_grid<R: Read>(
    reader: R,
    dimensions: GridDimensions,
) -> Result<PredictionGrid, GridError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Vec<i32>> = Vec::new();
    let mut extra_rows = 0;

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }
        if rows.len() == dimensions.rows {
            extra_rows += 1;
            continue;
        }
        let line = record
            .position()
            .map_or(index as u64 + 1, csv::Position::line);

        if record.len() != dimensions.cols {
            return Err(GridError::ColumnCountMismatch {
                line,
                expected: dimensions.cols,
                actual: record.len(),
            });
        }

        let values = record
            .iter()
            .enumerate()
            .map(|(i, token)| {
                token.parse::<i32>().map_err(|_| GridError::MalformedValue {
                    line,
                    column: i + 1,
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(values);
    }

    if rows.len() != dimensions.rows || extra_rows > 0 {
        return Err(GridError::RowCountMismatch {
            expected: dimensions.rows,
            actual: rows.len() + extra_rows,
        });
    }

    log::debug!("Parsed {} rows of {} values", rows.len(), dimensions.cols);

    Ok(PredictionGrid::from_rows(rows)?)
}
