#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Severity bands and prediction grid types.
//!
//! A prediction value in `[0, 256)` falls into exactly one of eight
//! [`SeverityBand`]s, each 32 wide. Bands carry the color used to fill the
//! heatmap cell. The [`grid`] module holds the immutable 2D container the
//! loader produces.

pub mod grid;

pub use grid::{GridDimensions, GridShapeError, MAX_CELLS, PredictionGrid};

use strum_macros::{AsRefStr, Display};

/// Width of every severity band.
pub const BAND_WIDTH: i32 = 32;

/// Exclusive upper bound of the classifiable range.
pub const MAX_PREDICTION: i32 = 256;

/// Pollution severity band, from lowest (green) to highest (red).
///
/// Bands are half-open: a value on a boundary belongs to the upper band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SeverityBand {
    /// `[0, 32)`
    Green,
    /// `[32, 64)`
    MediumGreen,
    /// `[64, 96)`
    LightGreen,
    /// `[96, 128)`
    LimeGreen,
    /// `[128, 160)`
    Gold,
    /// `[160, 192)`
    Orange,
    /// `[192, 224)`
    RedOrange,
    /// `[224, 256)`
    Red,
}

impl SeverityBand {
    /// Returns all bands in severity order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Green,
            Self::MediumGreen,
            Self::LightGreen,
            Self::LimeGreen,
            Self::Gold,
            Self::Orange,
            Self::RedOrange,
            Self::Red,
        ]
    }

    /// Classifies a prediction value into its band.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside `[0, 256)`.
    pub const fn classify(value: i32) -> Result<Self, OutOfRangeError> {
        if value < 0 || value >= MAX_PREDICTION {
            return Err(OutOfRangeError { value });
        }

        #[allow(clippy::cast_sign_loss)]
        let index = (value / BAND_WIDTH) as usize;
        Ok(Self::all()[index])
    }

    /// Returns the hex color code used to fill cells in this band.
    #[must_use]
    pub const fn color_code(self) -> &'static str {
        match self {
            Self::Green => "#00ff00",
            Self::MediumGreen => "#40ff00",
            Self::LightGreen => "#80ff00",
            Self::LimeGreen => "#c0ff00",
            Self::Gold => "#ffc000",
            Self::Orange => "#ff8000",
            Self::RedOrange => "#ff4000",
            Self::Red => "#ff0000",
        }
    }

    /// Returns the half-open `(lower, upper)` range covered by this band.
    #[must_use]
    pub const fn range(self) -> (i32, i32) {
        let lower = self as i32 * BAND_WIDTH;
        (lower, lower + BAND_WIDTH)
    }
}

/// Error returned when a prediction value cannot be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRangeError {
    /// The value that fell outside `[0, 256)`.
    pub value: i32,
}

impl std::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "value {} out of classification range: expected 0-{}",
            self.value,
            MAX_PREDICTION - 1
        )
    }
}

impl std::error::Error for OutOfRangeError {}
