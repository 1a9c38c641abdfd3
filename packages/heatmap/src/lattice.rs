//! Corner lattice spanning the bounding box.
//!
//! A grid of `R x C` cells has `(R + 1) x (C + 1)` corners. Corner
//! `[row][col]` is the top-left of cell `[row][col]`, the top-right of cell
//! `[row][col - 1]`, and so on: every corner is computed once and shared by
//! all cells touching it, so neighbouring polygons meet without gaps.
//!
//! Longitudes depend only on the column and latitudes only on the row, so
//! each axis is interpolated once in exact decimal arithmetic and converted
//! to `f64` at the very end.

use geo::Coord;
use pollution_heatmap_models::{GridDimensions, MAX_CELLS};
use rust_decimal::Decimal;

use crate::config::BoundingBox;

/// Errors that can occur while computing the lattice.
#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    /// Rows or columns were zero, or the grid is too large.
    #[error(
        "grid dimensions must be positive and at most {max} cells, got {0}",
        max = MAX_CELLS
    )]
    InvalidDimensions(GridDimensions),

    /// Decimal arithmetic overflowed.
    #[error("decimal overflow while interpolating {axis}")]
    Overflow {
        /// Which axis was being interpolated.
        axis: &'static str,
    },

    /// A decimal coordinate could not be represented as `f64`.
    #[error("coordinate {0} has no f64 representation")]
    Conversion(Decimal),
}

/// The `(R + 1) x (C + 1)` grid of cell corners.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerLattice {
    dimensions: GridDimensions,
    longitudes: Vec<Decimal>,
    latitudes: Vec<Decimal>,
    points: Vec<Coord<f64>>,
}

impl CornerLattice {
    /// Computes the lattice for `dimensions` cells spread over `bounds`.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero, the grid exceeds
    /// [`MAX_CELLS`], or the decimal arithmetic overflows.
    pub fn compute(bounds: &BoundingBox, dimensions: GridDimensions) -> Result<Self, LatticeError> {
        if !dimensions.is_supported() {
            return Err(LatticeError::InvalidDimensions(dimensions));
        }

        let longitudes = interpolate(bounds.west, bounds.east, dimensions.cols, "longitude")?;
        let latitudes = interpolate(bounds.north, bounds.south, dimensions.rows, "latitude")?;

        let xs = longitudes
            .iter()
            .map(|lng| to_f64(*lng))
            .collect::<Result<Vec<_>, _>>()?;
        let ys = latitudes
            .iter()
            .map(|lat| to_f64(*lat))
            .collect::<Result<Vec<_>, _>>()?;

        let mut points = Vec::with_capacity(xs.len() * ys.len());
        for y in &ys {
            for x in &xs {
                points.push(Coord { x: *x, y: *y });
            }
        }

        log::debug!(
            "Computed {}x{} corner lattice from ({}, {}) to ({}, {})",
            ys.len(),
            xs.len(),
            bounds.west,
            bounds.north,
            bounds.east,
            bounds.south
        );

        Ok(Self {
            dimensions,
            longitudes,
            latitudes,
            points,
        })
    }

    /// Cell dimensions this lattice was computed for.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of cell rows (one less than the number of corner rows).
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.dimensions.rows
    }

    /// Number of cell columns (one less than the number of corner columns).
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.dimensions.cols
    }

    /// Returns corner `[row][col]` as a `(longitude, latitude)` coordinate.
    ///
    /// `row` ranges over `0..=rows()` and `col` over `0..=cols()`.
    #[must_use]
    pub fn corner(&self, row: usize, col: usize) -> Option<Coord<f64>> {
        if row > self.dimensions.rows || col > self.dimensions.cols {
            return None;
        }
        self.points
            .get(row * (self.dimensions.cols + 1) + col)
            .copied()
    }

    /// Returns the exact `(longitude, latitude)` of corner `[row][col]`.
    #[must_use]
    pub fn decimal_corner(&self, row: usize, col: usize) -> Option<(Decimal, Decimal)> {
        Some((*self.longitudes.get(col)?, *self.latitudes.get(row)?))
    }

    /// Returns the four corners of cell `[row][col]` clockwise from the
    /// top-left: top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub fn cell_corners(&self, row: usize, col: usize) -> Option<[Coord<f64>; 4]> {
        if row >= self.dimensions.rows || col >= self.dimensions.cols {
            return None;
        }
        Some([
            self.corner(row, col)?,
            self.corner(row, col + 1)?,
            self.corner(row + 1, col + 1)?,
            self.corner(row + 1, col)?,
        ])
    }
}

/// Returns `steps + 1` evenly spaced values `start + i * (end - start) / steps`.
fn interpolate(
    start: Decimal,
    end: Decimal,
    steps: usize,
    axis: &'static str,
) -> Result<Vec<Decimal>, LatticeError> {
    let overflow = || LatticeError::Overflow { axis };

    let step = end
        .checked_sub(start)
        .and_then(|span| span.checked_div(Decimal::from(steps)))
        .ok_or_else(overflow)?;

    (0..=steps)
        .map(|i| {
            Decimal::from(i)
                .checked_mul(step)
                .and_then(|offset| start.checked_add(offset))
                .ok_or_else(overflow)
        })
        .collect()
}

/// Converts through the canonical decimal string so the result is the
/// nearest `f64`.
fn to_f64(value: Decimal) -> Result<f64, LatticeError> {
    value
        .to_string()
        .parse::<f64>()
        .map_err(|_| LatticeError::Conversion(value))
}
