//! Typed RW5 records
//!
//! Converts a [`RawRecord`] field map into a closed [`Record`] variant with
//! parsed numeric values. Where the shot grammar admits several sources for
//! the same quantity, a fixed precedence applies:
//! horizontal angle `AZ` > `AR/AL/DL/DR` > `BR`, vertical `ZE` > `VA` > `CE`,
//! distance `SD` > `HD`.

use super::field_parsers::{
    parse_optional_f64, parse_optional_string, parse_required_f64, parse_required_string,
};
use super::grammar::{RawRecord, RecordType, ShotType};
use crate::models::{DistanceKind, Point, VerticalKind};
use thiserror::Error;

/// Reasons a recognized line could not be typed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("missing required field {field}")]
    MissingField { field: &'static str },

    #[error("field {field} is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Job setup (MO). Unit codes stay raw; resolving them is the processor's job.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeRecord {
    pub date: Option<String>,
    pub distance_unit_code: Option<String>,
    pub scale_factor: Option<f64>,
    pub curvature_correction: Option<String>,
    pub edm_offset: Option<f64>,
    pub angle_unit_code: Option<String>,
}

/// Occupy point (OC)
#[derive(Debug, Clone, PartialEq)]
pub struct OccupyRecord {
    pub station: String,
    pub position: Point,
    pub note: Option<String>,
}

/// Line of sight (LS)
#[derive(Debug, Clone, PartialEq)]
pub struct LineOfSightRecord {
    pub instrument_height: Option<f64>,
    pub target_height: Option<f64>,
}

/// Backsight (BK)
#[derive(Debug, Clone, PartialEq)]
pub struct BacksightRecord {
    pub station: Option<String>,
    pub backsight_point: String,
    pub azimuth: Option<f64>,
    pub circle: Option<f64>,
}

/// Store point (SP)
#[derive(Debug, Clone, PartialEq)]
pub struct StorePointRecord {
    pub name: String,
    pub position: Point,
    pub note: Option<String>,
}

/// Horizontal direction of a shot as recorded
#[derive(Debug, Clone, PartialEq)]
pub enum HorizontalAngle {
    Azimuth(f64),
    /// Angle right/left or deflection right/left
    Angle(f64),
    /// Quadrant bearing text such as `N45.3000E`
    Bearing(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalValue {
    pub kind: VerticalKind,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    pub kind: DistanceKind,
    pub value: f64,
}

/// Polar shot (SS, TR, BD, BR, FD, FR)
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRecord {
    pub shot_type: ShotType,
    pub station: Option<String>,
    pub foresight: String,
    pub horizontal: Option<HorizontalAngle>,
    pub vertical: Option<VerticalValue>,
    pub distance: Option<Distance>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Mode(ModeRecord),
    Occupy(OccupyRecord),
    LineOfSight(LineOfSightRecord),
    Backsight(BacksightRecord),
    StorePoint(StorePointRecord),
    Shot(ShotRecord),
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        match self {
            Record::Mode(_) => RecordType::Mode,
            Record::Occupy(_) => RecordType::Occupy,
            Record::LineOfSight(_) => RecordType::LineOfSight,
            Record::Backsight(_) => RecordType::Backsight,
            Record::StorePoint(_) => RecordType::StorePoint,
            Record::Shot(shot) => RecordType::Shot(shot.shot_type),
        }
    }
}

impl TryFrom<&RawRecord> for Record {
    type Error = RecordError;

    fn try_from(raw: &RawRecord) -> Result<Self, Self::Error> {
        let record = match raw.record_type {
            RecordType::Mode => Record::Mode(ModeRecord {
                date: parse_optional_string(raw, "AD"),
                distance_unit_code: parse_optional_string(raw, "UN"),
                scale_factor: parse_optional_f64(raw, "SF")?,
                curvature_correction: parse_optional_string(raw, "EC"),
                edm_offset: parse_optional_f64(raw, "EO")?,
                angle_unit_code: parse_optional_string(raw, "AU"),
            }),
            RecordType::Occupy => Record::Occupy(OccupyRecord {
                station: parse_required_string(raw, "OP")?,
                position: parse_position(raw)?,
                note: parse_optional_string(raw, "note"),
            }),
            RecordType::LineOfSight => Record::LineOfSight(LineOfSightRecord {
                instrument_height: parse_optional_f64(raw, "HI")?,
                target_height: parse_optional_f64(raw, "HR")?,
            }),
            RecordType::Backsight => Record::Backsight(BacksightRecord {
                station: parse_optional_string(raw, "OP"),
                backsight_point: parse_required_string(raw, "BP")?,
                azimuth: parse_optional_f64(raw, "BS")?,
                circle: parse_optional_f64(raw, "BC")?,
            }),
            RecordType::StorePoint => Record::StorePoint(StorePointRecord {
                name: parse_required_string(raw, "PN")?,
                position: parse_position(raw)?,
                note: parse_optional_string(raw, "note"),
            }),
            RecordType::Shot(shot_type) => Record::Shot(ShotRecord {
                shot_type,
                station: parse_optional_string(raw, "OP"),
                foresight: parse_required_string(raw, "FP")?,
                horizontal: parse_horizontal(raw)?,
                vertical: parse_vertical(raw)?,
                distance: parse_distance(raw)?,
                note: parse_optional_string(raw, "note"),
            }),
        };
        Ok(record)
    }
}

fn parse_position(raw: &RawRecord) -> Result<Point, RecordError> {
    let northing = parse_required_f64(raw, "N")?;
    let easting = parse_required_f64(raw, "E")?;
    let elevation = parse_required_f64(raw, "EL")?;
    Ok(Point::new(easting, northing, elevation))
}

fn parse_horizontal(raw: &RawRecord) -> Result<Option<HorizontalAngle>, RecordError> {
    if let Some(azimuth) = parse_optional_f64(raw, "AZ")? {
        return Ok(Some(HorizontalAngle::Azimuth(azimuth)));
    }
    if let Some(angle) = parse_optional_f64(raw, "HA")? {
        return Ok(Some(HorizontalAngle::Angle(angle)));
    }
    Ok(parse_optional_string(raw, "BR").map(HorizontalAngle::Bearing))
}

fn parse_vertical(raw: &RawRecord) -> Result<Option<VerticalValue>, RecordError> {
    let sources = [
        ("ZE", VerticalKind::Zenithal),
        ("VA", VerticalKind::Vertical),
        ("CE", VerticalKind::ChangeInElevation),
    ];
    for (field, kind) in sources {
        if let Some(value) = parse_optional_f64(raw, field)? {
            return Ok(Some(VerticalValue { kind, value }));
        }
    }
    Ok(None)
}

fn parse_distance(raw: &RawRecord) -> Result<Option<Distance>, RecordError> {
    let sources = [("SD", DistanceKind::Slope), ("HD", DistanceKind::Horizontal)];
    for (field, kind) in sources {
        if let Some(value) = parse_optional_f64(raw, field)? {
            return Ok(Some(Distance { kind, value }));
        }
    }
    Ok(None)
}
