//! Angle and distance conversions for survey observations.
//!
//! Pure functions converting between degrees, packed DMS (`DDD.MMSSss`),
//! radians, gon and NATO mil, plus the survey-specific transforms used when
//! resolving polar shots: bearing to azimuth, vertical to zenithal angle and
//! horizontal to slope distance.

use crate::constants::{DEGENERATE_DIVISOR, DMS_EPSILON};
use crate::error::ConversionError;
use crate::models::AngleUnit;
use std::f64::consts::PI;

/// Reference direction of a vertical angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleReference {
    /// 0 at the zenith
    Zenithal,
    /// 0 at the horizon
    Vertical,
}

/// Unpack a `DDD.MMSSss` value into decimal degrees
fn dms_to_deg(angle: f64) -> f64 {
    let sign = if angle < 0.0 { -1.0 } else { 1.0 };
    let magnitude = angle.abs();

    let degrees = magnitude.trunc();
    let rest = (magnitude - degrees) * 100.0;
    let minutes = (rest + DMS_EPSILON).floor();
    let seconds = ((rest - minutes) * 100.0).max(0.0);

    sign * (degrees + minutes / 60.0 + seconds / 3600.0)
}

/// Pack decimal degrees into a `DDD.MMSSss` value
fn deg_to_dms(angle: f64) -> f64 {
    let sign = if angle < 0.0 { -1.0 } else { 1.0 };
    let magnitude = angle.abs();

    let mut degrees = magnitude.trunc();
    let total_minutes = (magnitude - degrees) * 60.0;
    let mut minutes = (total_minutes + DMS_EPSILON).floor();
    let seconds = ((total_minutes - minutes) * 60.0).max(0.0);
    if minutes >= 60.0 {
        degrees += 1.0;
        minutes -= 60.0;
    }

    sign * (degrees + minutes / 100.0 + seconds / 10_000.0)
}

fn from_degrees(angle: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Deg => angle,
        AngleUnit::Dms => deg_to_dms(angle),
        AngleUnit::Gon => angle * 400.0 / 360.0,
        AngleUnit::Mil => angle * 6400.0 / 360.0,
        AngleUnit::Rad => angle.to_radians(),
    }
}

/// Convert an angle expressed in `unit` to decimal degrees
pub fn to_degrees(angle: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Deg => angle,
        AngleUnit::Dms => dms_to_deg(angle),
        AngleUnit::Gon => angle * 360.0 / 400.0,
        AngleUnit::Mil => angle * 360.0 / 6400.0,
        AngleUnit::Rad => angle.to_degrees(),
    }
}

/// Convert an angle expressed in `unit` to radians
pub fn to_radians(angle: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Rad => angle,
        AngleUnit::Gon => angle * (2.0 * PI) / 400.0,
        AngleUnit::Mil => angle * (2.0 * PI) / 6400.0,
        _ => to_degrees(angle, unit).to_radians(),
    }
}

/// Convert an angle expressed in `unit` to gon
pub fn to_gon(angle: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Gon => angle,
        AngleUnit::Mil => angle * 400.0 / 6400.0,
        AngleUnit::Rad => angle * 400.0 / (2.0 * PI),
        _ => from_degrees(to_degrees(angle, unit), AngleUnit::Gon),
    }
}

/// Convert an angle expressed in `unit` to NATO mil
pub fn to_mil(angle: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Mil => angle,
        AngleUnit::Gon => angle * 6400.0 / 400.0,
        AngleUnit::Rad => angle * 6400.0 / (2.0 * PI),
        _ => from_degrees(to_degrees(angle, unit), AngleUnit::Mil),
    }
}

/// Convert an angle expressed in `unit` to packed `DDD.MMSSss`
pub fn to_dms(angle: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Dms => angle,
        _ => deg_to_dms(to_degrees(angle, unit)),
    }
}

/// Convert between any two angle units
pub fn convert_angle(angle: f64, from: AngleUnit, to: AngleUnit) -> f64 {
    match to {
        AngleUnit::Deg => to_degrees(angle, from),
        AngleUnit::Rad => to_radians(angle, from),
        AngleUnit::Gon => to_gon(angle, from),
        AngleUnit::Mil => to_mil(angle, from),
        AngleUnit::Dms => to_dms(angle, from),
    }
}

/// Quarter, half and full turn expressed in `unit`; DMS is handled in degrees.
fn turns(unit: AngleUnit) -> (f64, f64, f64) {
    match unit {
        AngleUnit::Deg | AngleUnit::Dms => (90.0, 180.0, 360.0),
        AngleUnit::Gon => (100.0, 200.0, 400.0),
        AngleUnit::Rad => (PI / 2.0, PI, 2.0 * PI),
        AngleUnit::Mil => (1600.0, 3200.0, 6400.0),
    }
}

/// Apply `op` to an angle in its own unit, routing DMS through decimal
/// degrees so the sexagesimal packing is respected.
fn in_linear_unit(angle: f64, unit: AngleUnit, op: impl Fn(f64) -> f64) -> f64 {
    match unit {
        AngleUnit::Dms => deg_to_dms(op(dms_to_deg(angle))),
        _ => op(angle),
    }
}

/// Recover the slope distance from a horizontal (zenithal angle) or
/// vertical (vertical angle) distance component.
pub fn horizontal_to_slope(
    distance: f64,
    angle: f64,
    unit: AngleUnit,
    reference: AngleReference,
) -> Result<f64, ConversionError> {
    let radians = to_radians(angle, unit);
    let divisor = match reference {
        AngleReference::Zenithal => radians.sin(),
        AngleReference::Vertical => radians.cos(),
    };

    if divisor.abs() < DEGENERATE_DIVISOR {
        return Err(ConversionError::DegenerateAngle {
            angle,
            unit: unit.to_string(),
        });
    }

    Ok(distance / divisor)
}

/// Convert a horizon-referenced angle to a zenith-referenced one
pub fn vertical_to_zenithal(angle: f64, unit: AngleUnit) -> f64 {
    let (quarter, _, _) = turns(unit);
    in_linear_unit(angle, unit, |a| quarter - a)
}

/// Convert a quadrant bearing such as `N45.3000E` to a full-circle azimuth
pub fn bearing_to_azimuth(bearing: &str, unit: AngleUnit) -> Result<f64, ConversionError> {
    let invalid = |reason: &str| ConversionError::InvalidBearing {
        bearing: bearing.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = bearing.trim();
    let mut chars = trimmed.chars();
    let first = chars.next().ok_or_else(|| invalid("empty bearing"))?;
    let last = chars.next_back().ok_or_else(|| invalid("missing quadrant"))?;
    let magnitude: f64 = chars
        .as_str()
        .trim()
        .parse()
        .map_err(|_| invalid("magnitude is not a number"))?;

    let (_, half, full) = turns(unit);
    let azimuth = match (first.to_ascii_uppercase(), last.to_ascii_uppercase()) {
        ('N', 'E') => magnitude,
        ('S', 'E') => in_linear_unit(magnitude, unit, |a| half - a),
        ('N', 'W') => in_linear_unit(magnitude, unit, |a| full - a),
        ('S', 'W') => in_linear_unit(magnitude, unit, |a| half + a),
        _ => return Err(invalid("quadrant must be one of NE, SE, NW, SW")),
    };

    Ok(azimuth)
}
