//! Feature table writer
//!
//! Flattens a feature stream into a polars DataFrame, one row per feature,
//! and writes it as Parquet or CSV.

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Result, Rw5Error};
use crate::models::Feature;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Build the feature table
pub fn features_to_dataframe(features: &[Feature]) -> Result<DataFrame> {
    let column = |f: fn(&Feature) -> Option<f64>| features.iter().map(f).collect::<Vec<_>>();

    let df = df!(
        "id" => features.iter().map(|f| f.id).collect::<Vec<_>>(),
        "kind" => features.iter().map(|f| f.kind.as_str()).collect::<Vec<_>>(),
        "point_name" => features.iter().map(|f| f.point_name.as_str()).collect::<Vec<_>>(),
        "easting" => features.iter().map(|f| f.geometry.easting).collect::<Vec<_>>(),
        "northing" => features.iter().map(|f| f.geometry.northing).collect::<Vec<_>>(),
        "elevation" => features.iter().map(|f| f.geometry.elevation).collect::<Vec<_>>(),
        "distance_unit" => features
            .iter()
            .map(|f| f.properties.distance_unit.map(|u| u.as_str()))
            .collect::<Vec<_>>(),
        "angle_unit" => features
            .iter()
            .map(|f| f.properties.angle_unit.map(|u| u.as_str()))
            .collect::<Vec<_>>(),
        "instrument_height" => column(|f| f.properties.instrument_height),
        "target_height" => column(|f| f.properties.target_height),
        "station_name" => features
            .iter()
            .map(|f| f.properties.station_name.as_deref())
            .collect::<Vec<_>>(),
        "azimuth" => column(|f| f.properties.azimuth),
        "circle" => column(|f| f.properties.circle),
        "horizontal_angle" => column(|f| f.properties.horizontal_angle),
        "vertical_value" => column(|f| f.properties.vertical_value),
        "vertical_kind" => features
            .iter()
            .map(|f| f.properties.vertical_kind.map(|k| k.as_str()))
            .collect::<Vec<_>>(),
        "distance" => column(|f| f.properties.distance),
        "distance_kind" => features
            .iter()
            .map(|f| f.properties.distance_kind.map(|k| k.as_str()))
            .collect::<Vec<_>>(),
        "notes" => features
            .iter()
            .map(|f| f.properties.notes.join("; "))
            .collect::<Vec<_>>(),
        "synthetic" => features.iter().map(|f| f.properties.synthetic).collect::<Vec<_>>(),
        "default_instrument_height" => features
            .iter()
            .map(|f| f.properties.default_instrument_height)
            .collect::<Vec<_>>(),
    )?;

    Ok(df)
}

/// Writes feature tables for one output path
#[derive(Debug)]
pub struct FeatureTableWriter {
    output_path: PathBuf,
    config: OutputConfig,
}

impl FeatureTableWriter {
    pub fn new(output_path: PathBuf, config: OutputConfig) -> Self {
        Self {
            output_path,
            config,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write the features, returning the number of rows written
    pub fn write(&self, features: &[Feature]) -> Result<usize> {
        let mut df = features_to_dataframe(features)?;

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = File::create(&self.output_path)?;

        let written = match self.config.format {
            OutputFormat::Parquet => ParquetWriter::new(file)
                .with_compression(self.config.compression.to_polars_compression())
                .finish(&mut df)
                .map(|_| ()),
            OutputFormat::Csv => CsvWriter::new(&mut file).include_header(true).finish(&mut df),
        };
        written.map_err(|e| Rw5Error::ProcessingFailed {
            path: self.output_path.clone(),
            reason: format!("Failed to write feature table: {}", e),
        })?;

        debug!(
            "Wrote {} features to {}",
            df.height(),
            self.output_path.display()
        );
        Ok(df.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionAlgorithm;
    use crate::models::{DistanceUnit, FeatureKind, FeatureProperties, Point};
    use tempfile::TempDir;

    fn sample_features() -> Vec<Feature> {
        vec![
            Feature::new(
                0,
                FeatureKind::Point,
                "CP1",
                Point::new(2000.0, 1000.0, 100.0),
                FeatureProperties {
                    distance_unit: Some(DistanceUnit::Meter),
                    notes: vec!["Hub".to_string()],
                    ..Default::default()
                },
            ),
            Feature::new(
                1,
                FeatureKind::Station,
                "1",
                Point::new(2000.0, 1000.0, 100.0),
                FeatureProperties {
                    instrument_height: Some(1.5),
                    ..Default::default()
                },
            ),
        ]
    }

    #[test]
    fn test_dataframe_shape() {
        let df = features_to_dataframe(&sample_features()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 21);
        assert!(df.column("instrument_height").is_ok());
    }

    #[test]
    fn test_empty_feature_table() {
        let df = features_to_dataframe(&[]).unwrap();
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn test_write_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("job.csv");
        let writer = FeatureTableWriter::new(
            path.clone(),
            OutputConfig {
                format: OutputFormat::Csv,
                compression: CompressionAlgorithm::Uncompressed,
            },
        );

        let rows = writer.write(&sample_features()).unwrap();
        assert_eq!(rows, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("id,kind,point_name,easting"));
        assert!(lines.next().unwrap().contains("CP1"));
    }

    #[test]
    fn test_write_parquet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("job.parquet");
        let writer = FeatureTableWriter::new(path.clone(), OutputConfig::default());

        writer.write(&sample_features()).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
