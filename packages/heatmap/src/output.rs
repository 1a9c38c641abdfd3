//! Serializes the feature collection and writes it to disk.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use geojson::FeatureCollection;

/// Errors that can occur while producing the output document.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// The collection could not be serialized.
    #[error("failed to serialize heatmap: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The output file could not be created or written.
    #[error("failed to write heatmap to {}: {source}", .path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Serializes the collection as a compact `GeoJSON` document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_geojson_string(collection: &FeatureCollection) -> Result<String, OutputError> {
    Ok(serde_json::to_string(collection)?)
}

/// Writes the collection to `path`, replacing any existing file.
///
/// The document is fully serialized before the file is created, so a
/// serialization failure never leaves a partial file behind.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<(), OutputError> {
    let document = to_geojson_string(collection)?;
    let write_error = |source: std::io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(document.as_bytes()).map_err(write_error)?;
    writer.flush().map_err(write_error)?;

    log::info!(
        "Wrote {} features ({} bytes) to {}",
        collection.features.len(),
        document.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use geojson::GeoJson;

    use super::*;

    fn empty_collection() -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pollution_heatmap_output_{}_{name}",
            std::process::id()
        ))
    }

    #[test]
    fn serializes_as_feature_collection() {
        let document = to_geojson_string(&empty_collection()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"], serde_json::json!([]));
    }

    #[test]
    fn writes_parseable_geojson() {
        let path = temp_path("written.geojson");
        write_geojson(&path, &empty_collection()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let parsed: GeoJson = contents.parse().unwrap();
        assert!(matches!(parsed, GeoJson::FeatureCollection(fc) if fc.features.is_empty()));
    }

    #[test]
    fn unwritable_path_is_write_error() {
        let path = temp_path("missing_dir").join("heatmap.geojson");
        let err = write_geojson(&path, &empty_collection()).unwrap_err();
        assert!(matches!(err, OutputError::Write { .. }));
        assert!(err.to_string().contains("heatmap.geojson"));
    }
}
