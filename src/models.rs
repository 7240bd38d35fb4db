//! Core data structures and types for RW5 processing.
//!
//! Defines unit systems, coordinates, station anchors, the output feature
//! entity, diagnostics and processing statistics used throughout the library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Angle representations understood by the conversion library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    /// Degrees-minutes-seconds packed as DDD.MMSSss
    Dms,
    /// Gon (grad), 400 per full turn
    Gon,
    /// NATO mil, 6400 per full turn
    Mil,
    /// Decimal degrees
    Deg,
    /// Radians
    Rad,
}

impl AngleUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AngleUnit::Dms => "dms",
            AngleUnit::Gon => "gon",
            AngleUnit::Mil => "mil",
            AngleUnit::Deg => "deg",
            AngleUnit::Rad => "rad",
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Linear units a data collector may record distances in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "feet")]
    Feet,
    #[serde(rename = "meter")]
    Meter,
    /// US survey feet
    #[serde(rename = "ussfeet")]
    UsSurveyFeet,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Feet => "feet",
            DistanceUnit::Meter => "meter",
            DistanceUnit::UsSurveyFeet => "ussfeet",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Units declared by the job's MO record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSystem {
    pub angle_unit: AngleUnit,
    pub distance_unit: DistanceUnit,
}

/// 3-D Cartesian coordinate in the file's native distance unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub easting: f64,
    pub northing: f64,
    pub elevation: f64,
}

impl Point {
    pub const fn new(easting: f64, northing: f64, elevation: f64) -> Self {
        Self {
            easting,
            northing,
            elevation,
        }
    }

    /// Distance to `other` projected on the horizontal plane
    pub fn horizontal_distance_to(&self, other: &Point) -> f64 {
        (self.easting - other.easting).hypot(self.northing - other.northing)
    }

    pub fn is_finite(&self) -> bool {
        self.easting.is_finite() && self.northing.is_finite() && self.elevation.is_finite()
    }
}

/// Station anchor used as origin for polar observations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasePoint {
    pub position: Point,
    pub instrument_height: f64,
    /// Horizontal circle reading of the zero direction, in the job angle unit
    pub zero_bearing: f64,
}

impl BasePoint {
    pub fn new(position: Point, instrument_height: f64) -> Self {
        Self {
            position,
            instrument_height,
            zero_bearing: 0.0,
        }
    }
}

/// How the vertical component of a shot was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalKind {
    /// Angle measured down from the zenith (ZE)
    Zenithal,
    /// Angle measured from the horizon (VA)
    Vertical,
    /// Direct elevation difference (CE)
    ChangeInElevation,
}

impl VerticalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalKind::Zenithal => "zenithal",
            VerticalKind::Vertical => "vertical",
            VerticalKind::ChangeInElevation => "change_in_elevation",
        }
    }
}

/// How the distance of a shot was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceKind {
    Slope,
    Horizontal,
}

impl DistanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceKind::Slope => "slope",
            DistanceKind::Horizontal => "horizontal",
        }
    }
}

/// Output feature categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Point,
    Station,
    Backsight,
    PolarObservation,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Point => "point",
            FeatureKind::Station => "station",
            FeatureKind::Backsight => "backsight",
            FeatureKind::PolarObservation => "polar_observation",
        }
    }
}

/// Mode-specific attributes attached to a feature.
///
/// Every field is optional; which ones are populated depends on the feature
/// kind and the emission mode that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_unit: Option<DistanceUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_unit: Option<AngleUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_height: Option<f64>,
    /// Owning station, by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azimuth: Option<f64>,
    /// Horizontal circle reading of a backsight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_kind: Option<VerticalKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_kind: Option<DistanceKind>,
    /// Free-text notes carried over from the source line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Station synthesized because no occupy record preceded it
    #[serde(default)]
    pub synthetic: bool,
    /// Instrument height is still the placeholder set by the occupy record
    #[serde(default)]
    pub default_instrument_height: bool,
}

/// One entry of the output stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: u64,
    pub kind: FeatureKind,
    pub point_name: String,
    pub geometry: Point,
    pub properties: FeatureProperties,
}

impl Feature {
    pub fn new(
        id: u64,
        kind: FeatureKind,
        point_name: impl Into<String>,
        geometry: Point,
        properties: FeatureProperties,
    ) -> Self {
        Self {
            id,
            kind,
            point_name: point_name.into(),
            geometry,
            properties,
        }
    }

    pub fn is_station(&self) -> bool {
        self.kind == FeatureKind::Station
    }
}

/// Severity of a recovered condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// A condition the processor recovered from while reading a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based source line number
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        write!(f, "line {} [{}]: {}", self.line, label, self.message)
    }
}

/// Per-run parse statistics
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    pub lines_read: usize,
    pub comment_lines: usize,
    pub records_classified: usize,
    pub records_skipped: usize,
    pub features_emitted: usize,
    pub synthetic_stations: usize,
}

/// Result of converting one file from the CLI
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_features: usize,
    pub total_diagnostics: usize,
    pub output_paths: Vec<PathBuf>,
    pub processing_time_ms: u128,
}
