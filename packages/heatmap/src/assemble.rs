//! Builds one colored polygon feature per grid cell.

use std::collections::BTreeMap;

use geo::{Coord, LineString, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use pollution_heatmap_models::{GridDimensions, OutOfRangeError, PredictionGrid, SeverityBand};

use crate::lattice::CornerLattice;

/// Errors that can occur while assembling features.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// The grid and lattice disagree on the number of cells.
    #[error("prediction grid is {grid} but the corner lattice was computed for {lattice}")]
    DimensionMismatch {
        /// Dimensions of the prediction grid.
        grid: GridDimensions,
        /// Dimensions the lattice was computed for.
        lattice: GridDimensions,
    },

    /// A cell's value could not be classified.
    #[error("cell ({row}, {col}): {source}")]
    Classification {
        /// Zero-based row of the cell.
        row: usize,
        /// Zero-based column of the cell.
        col: usize,
        /// The classification failure.
        source: OutOfRangeError,
    },
}

/// Builds the feature for one cell from its four corners (clockwise from
/// the top-left). The ring is closed by repeating the first corner.
#[must_use]
pub fn cell_feature(corners: [Coord<f64>; 4], band: SeverityBand, opacity: f64) -> Feature {
    let polygon = Polygon::new(LineString::from(corners.to_vec()), vec![]);
    let color = band.color_code();

    let mut properties = JsonObject::new();
    properties.insert("opacity".to_owned(), JsonValue::from(opacity));
    properties.insert("fill".to_owned(), JsonValue::from(color));
    properties.insert("rgb-string".to_owned(), JsonValue::from(color));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&polygon))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Assembles one feature per cell, in row-major order.
///
/// Adjacent cells are never merged, even when they share a color.
///
/// # Errors
///
/// Returns an error if the grid and lattice dimensions differ or any value
/// is outside the classification range.
pub fn assemble(
    grid: &PredictionGrid,
    lattice: &CornerLattice,
    opacity: f64,
) -> Result<FeatureCollection, AssembleError> {
    if grid.dimensions() != lattice.dimensions() {
        return Err(AssembleError::DimensionMismatch {
            grid: grid.dimensions(),
            lattice: lattice.dimensions(),
        });
    }

    let mut features = Vec::with_capacity(grid.dimensions().cell_count().unwrap_or(0));
    let mut band_counts: BTreeMap<SeverityBand, usize> = BTreeMap::new();

    for (row, col, value) in grid.cells() {
        let band = SeverityBand::classify(value)
            .map_err(|source| AssembleError::Classification { row, col, source })?;
        let corners = lattice
            .cell_corners(row, col)
            .ok_or(AssembleError::DimensionMismatch {
                grid: grid.dimensions(),
                lattice: lattice.dimensions(),
            })?;

        *band_counts.entry(band).or_default() += 1;
        features.push(cell_feature(corners, band, opacity));
    }

    for (band, count) in &band_counts {
        log::debug!("{band}: {count} cells");
    }
    log::info!("Assembled {} cell features", features.len());

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::*;
    use crate::config::BoundingBox;

    fn reference_lattice(dimensions: GridDimensions) -> CornerLattice {
        let bounds = BoundingBox {
            north: Decimal::from_str("55.946233").unwrap(),
            south: Decimal::from_str("55.942617").unwrap(),
            east: Decimal::from_str("-3.184319").unwrap(),
            west: Decimal::from_str("-3.192473").unwrap(),
        };
        CornerLattice::compute(&bounds, dimensions).unwrap()
    }

    fn ring(feature: &Feature) -> Vec<Vec<f64>> {
        match &feature.geometry.as_ref().unwrap().value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1, "cells have no holes");
                rings[0].clone()
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    fn fill(feature: &Feature) -> &str {
        feature
            .properties
            .as_ref()
            .and_then(|p| p.get("fill"))
            .and_then(JsonValue::as_str)
            .unwrap()
    }

    fn stripe_grid() -> PredictionGrid {
        PredictionGrid::from_rows(vec![vec![0, 32, 64, 96, 128, 160, 192, 224, 0, 0]; 10]).unwrap()
    }

    #[test]
    fn one_feature_per_cell() {
        let collection =
            assemble(&stripe_grid(), &reference_lattice(GridDimensions::new(10, 10)), 0.75)
                .unwrap();
        assert_eq!(collection.features.len(), 100);
    }

    #[test]
    fn stripe_colors_by_column() {
        let collection =
            assemble(&stripe_grid(), &reference_lattice(GridDimensions::new(10, 10)), 0.75)
                .unwrap();

        for (index, feature) in collection.features.iter().enumerate() {
            let expected = match index % 10 {
                0 | 8 | 9 => "#00ff00",
                1 => "#40ff00",
                2 => "#80ff00",
                3 => "#c0ff00",
                4 => "#ffc000",
                5 => "#ff8000",
                6 => "#ff4000",
                7 => "#ff0000",
                _ => unreachable!(),
            };
            assert_eq!(fill(feature), expected, "feature {index}");
        }
    }

    #[test]
    fn properties_carry_opacity_and_both_colors() {
        let feature = cell_feature(
            [
                Coord { x: 0.0, y: 1.0 },
                Coord { x: 1.0, y: 1.0 },
                Coord { x: 1.0, y: 0.0 },
                Coord { x: 0.0, y: 0.0 },
            ],
            SeverityBand::Gold,
            0.75,
        );
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties.len(), 3);
        assert_eq!(properties["opacity"], JsonValue::from(0.75));
        assert_eq!(properties["fill"], JsonValue::from("#ffc000"));
        assert_eq!(properties["rgb-string"], JsonValue::from("#ffc000"));
    }

    #[test]
    fn ring_is_closed_and_clockwise_from_top_left() {
        let lattice = reference_lattice(GridDimensions::new(10, 10));
        let collection = assemble(&stripe_grid(), &lattice, 0.75).unwrap();
        let ring = ring(&collection.features[0]);

        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);

        let corners = lattice.cell_corners(0, 0).unwrap();
        for (position, corner) in ring.iter().zip(corners) {
            assert_eq!(position, &vec![corner.x, corner.y]);
        }
    }

    #[test]
    fn adjacent_features_share_edges_exactly() {
        let collection =
            assemble(&stripe_grid(), &reference_lattice(GridDimensions::new(10, 10)), 0.75)
                .unwrap();
        let rings: Vec<_> = collection.features.iter().map(ring).collect();

        for row in 0..10 {
            for col in 0..10 {
                let cell = &rings[row * 10 + col];
                if col + 1 < 10 {
                    let right = &rings[row * 10 + col + 1];
                    assert_eq!(cell[1], right[0]);
                    assert_eq!(cell[2], right[3]);
                }
                if row + 1 < 10 {
                    let below = &rings[(row + 1) * 10 + col];
                    assert_eq!(cell[3], below[0]);
                    assert_eq!(cell[2], below[1]);
                }
            }
        }
    }

    #[test]
    fn rejects_out_of_range_value() {
        let mut rows = vec![vec![0; 3]; 2];
        rows[1][2] = 256;
        let grid = PredictionGrid::from_rows(rows).unwrap();
        let err = assemble(&grid, &reference_lattice(GridDimensions::new(2, 3)), 0.75).unwrap_err();

        match err {
            AssembleError::Classification { row, col, source } => {
                assert_eq!((row, col), (1, 2));
                assert_eq!(source.value, 256);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_mismatched_lattice() {
        let grid = PredictionGrid::from_rows(vec![vec![0; 3]; 2]).unwrap();
        assert!(matches!(
            assemble(&grid, &reference_lattice(GridDimensions::new(3, 2)), 0.75),
            Err(AssembleError::DimensionMismatch { .. })
        ));
    }
}
