//! Heatmap configuration.
//!
//! The reference deployment (a 10x10 grid over central Edinburgh) is
//! embedded at compile time from `heatmap.toml`. Setting
//! [`CONFIG_ENV_VAR`] to the path of another TOML file with the same schema
//! replaces it.
//!
//! Bounds are written as decimal strings so they stay exact all the way
//! into the lattice computation.

use std::path::{Path, PathBuf};
use std::str::FromStr as _;

use pollution_heatmap_models::{GridDimensions, MAX_CELLS};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Environment variable naming an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "HEATMAP_CONFIG";

const EMBEDDED_CONFIG: &str = include_str!("../heatmap.toml");

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or does not match the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but holds unusable values.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Geographic rectangle subdivided into grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundingBox {
    /// Northern latitude bound.
    #[serde(deserialize_with = "decimal_from_str")]
    pub north: Decimal,
    /// Southern latitude bound.
    #[serde(deserialize_with = "decimal_from_str")]
    pub south: Decimal,
    /// Eastern longitude bound.
    #[serde(deserialize_with = "decimal_from_str")]
    pub east: Decimal,
    /// Western longitude bound.
    #[serde(deserialize_with = "decimal_from_str")]
    pub west: Decimal,
}

impl BoundingBox {
    /// Checks that the bounds are real coordinates and describe a non-empty
    /// rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_lat = Decimal::from(90);
        let max_lng = Decimal::from(180);

        for (name, value) in [("north", self.north), ("south", self.south)] {
            if value.abs() > max_lat {
                return Err(ConfigError::Invalid(format!(
                    "{name} bound {value} is not a latitude in [-90, 90]"
                )));
            }
        }
        for (name, value) in [("east", self.east), ("west", self.west)] {
            if value.abs() > max_lng {
                return Err(ConfigError::Invalid(format!(
                    "{name} bound {value} is not a longitude in [-180, 180]"
                )));
            }
        }
        if self.north <= self.south {
            return Err(ConfigError::Invalid(format!(
                "north bound {} must be greater than south bound {}",
                self.north, self.south
            )));
        }
        if self.east <= self.west {
            return Err(ConfigError::Invalid(format!(
                "east bound {} must be greater than west bound {}",
                self.east, self.west
            )));
        }
        Ok(())
    }
}

/// Grid dimensions as written in the config file.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    rows: usize,
    cols: usize,
}

impl From<GridSection> for GridDimensions {
    fn from(section: GridSection) -> Self {
        Self::new(section.rows, section.cols)
    }
}

/// Everything the pipeline needs besides the input grid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeatmapConfig {
    /// Expected dimensions of the input grid.
    #[serde(rename = "grid", deserialize_with = "dimensions_from_section")]
    pub dimensions: GridDimensions,
    /// Geographic area covered by the grid.
    pub bounds: BoundingBox,
    /// Opacity written on every cell feature.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Where the `GeoJSON` document is written.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

const fn default_opacity() -> f64 {
    0.75
}

fn default_output_path() -> PathBuf {
    PathBuf::from("heatmap.geojson")
}

fn decimal_from_str<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Decimal::from_str(raw.trim())
        .map_err(|e| serde::de::Error::custom(format!("invalid decimal '{raw}': {e}")))
}

fn dimensions_from_section<'de, D>(deserializer: D) -> Result<GridDimensions, D::Error>
where
    D: Deserializer<'de>,
{
    GridSection::deserialize(deserializer).map(GridDimensions::from)
}

impl HeatmapConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the values are invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the embedded reference configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded file fails to parse.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(EMBEDDED_CONFIG)
    }

    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], falling back to the
    /// embedded reference configuration when it is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected configuration is unreadable or
    /// invalid.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                log::info!("Loading heatmap config from {path}");
                Self::from_file(Path::new(path.trim()))
            }
            _ => {
                log::debug!("{CONFIG_ENV_VAR} not set, using embedded config");
                Self::embedded()
            }
        }
    }

    /// Checks dimensions, bounds, opacity, and output path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dimensions.is_supported() {
            return Err(ConfigError::Invalid(format!(
                "grid dimensions must be positive and at most {MAX_CELLS} cells, got {}",
                self.dimensions
            )));
        }
        self.bounds.validate()?;
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::Invalid(format!(
                "opacity {} must be within [0, 1]",
                self.opacity
            )));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_path is empty".to_owned()));
        }
        Ok(())
    }
}
