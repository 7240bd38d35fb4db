//! Application constants for the RW5 processor
//!
//! Record type codes, unit code tables, sentinel values and defaults used
//! throughout the classifier, processor and CLI.

use crate::models::{AngleUnit, DistanceUnit, Point};

// =============================================================================
// Input Conventions
// =============================================================================

/// Prefix of free-text comment lines, dropped before classification
pub const TEXT_COMMENT_PREFIX: &str = "-- ";

/// Default file extension of RW5 raw data files
pub const RW5_EXTENSION: &str = "rw5";

// =============================================================================
// Record Type Codes
// =============================================================================

pub mod record_codes {
    /// Job mode / instrument setup
    pub const MODE: &str = "MO";
    /// Occupy point (station)
    pub const OCCUPY: &str = "OC";
    /// Line of sight (instrument and rod heights)
    pub const LINE_OF_SIGHT: &str = "LS";
    /// Backsight
    pub const BACKSIGHT: &str = "BK";
    /// Store point
    pub const STORE_POINT: &str = "SP";

    // Shot records, all sharing one grammar
    pub const SIDE_SHOT: &str = "SS";
    pub const TRAVERSE: &str = "TR";
    pub const BACKSIGHT_DIRECT: &str = "BD";
    pub const BACKSIGHT_REVERSE: &str = "BR";
    pub const FORESIGHT_DIRECT: &str = "FD";
    pub const FORESIGHT_REVERSE: &str = "FR";
}

// =============================================================================
// Unit Codes (MO record)
// =============================================================================

/// `AU` angle unit code to angle unit
pub fn angle_unit_from_code(code: &str) -> Option<AngleUnit> {
    match code.trim() {
        "0" => Some(AngleUnit::Dms),
        "1" => Some(AngleUnit::Gon),
        _ => None,
    }
}

/// `UN` distance unit code to distance unit
pub fn distance_unit_from_code(code: &str) -> Option<DistanceUnit> {
    match code.trim() {
        "0" => Some(DistanceUnit::Feet),
        "1" => Some(DistanceUnit::Meter),
        "2" => Some(DistanceUnit::UsSurveyFeet),
        _ => None,
    }
}

// =============================================================================
// Sentinels
// =============================================================================

/// Position substituted for a station that was never occupied
pub const UNKNOWN_STATION: Point = Point::new(-1.0, -1.0, -1.0);

/// Position substituted for a point name missing from the registry
pub const UNKNOWN_POINT: Point = Point::new(-1.0, -1.0, -1.0);

/// Prefix of generated names for synthetic stations
pub const SYNTHETIC_STATION_PREFIX: &str = "station_";

/// Note attached to synthetic stations
pub const SYNTHETIC_NOTE: &str = "FAKE";

// =============================================================================
// Numeric Tolerances
// =============================================================================

/// Divisors smaller than this are treated as zero in slope recovery
pub const DEGENERATE_DIVISOR: f64 = 1e-12;

/// Slack used when splitting packed DMS values into minutes and seconds
pub const DMS_EPSILON: f64 = 1e-9;
