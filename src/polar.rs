//! Polar-to-Cartesian resolution of total-station shots.
//!
//! Given a station anchor and one observation (horizontal direction,
//! vertical component, distance and target height), computes the absolute
//! coordinate of the observed point. Coordinates are always produced in
//! easting-northing-elevation order.

use crate::conversion::{AngleReference, horizontal_to_slope, to_radians, vertical_to_zenithal};
use crate::error::ConversionError;
use crate::models::{AngleUnit, BasePoint, DistanceKind, Point, VerticalKind};

/// One shot ready for resolution. Transient: consumed by [`PolarObservation::resolve`].
#[derive(Debug, Clone, Copy)]
pub struct PolarObservation<'a> {
    pub angle_unit: AngleUnit,
    /// Azimuth-referenced horizontal direction, bearings already converted
    pub horizontal_angle: f64,
    pub vertical_kind: VerticalKind,
    pub vertical_value: f64,
    pub distance_kind: DistanceKind,
    pub distance: f64,
    pub target_height: f64,
    pub base_point: &'a BasePoint,
}

impl PolarObservation<'_> {
    /// Resolve the observed point. Never mutates the base point.
    pub fn resolve(&self) -> Result<Point, ConversionError> {
        let unit = self.angle_unit;
        let azimuth = to_radians(self.horizontal_angle, unit)
            + to_radians(self.base_point.zero_bearing, unit);

        let (horizontal_distance, height_difference) = match self.vertical_kind {
            VerticalKind::ChangeInElevation => self.offsets_from_elevation_change()?,
            VerticalKind::Zenithal | VerticalKind::Vertical => {
                let zenithal = match self.vertical_kind {
                    VerticalKind::Vertical => vertical_to_zenithal(self.vertical_value, unit),
                    _ => self.vertical_value,
                };
                let slope_distance = match self.distance_kind {
                    DistanceKind::Slope => self.distance,
                    DistanceKind::Horizontal => {
                        horizontal_to_slope(self.distance, zenithal, unit, AngleReference::Zenithal)?
                    }
                };
                let zenithal = to_radians(zenithal, unit);
                (slope_distance * zenithal.sin(), slope_distance * zenithal.cos())
            }
        };

        let origin = self.base_point.position;
        let point = Point::new(
            origin.easting + horizontal_distance * azimuth.sin(),
            origin.northing + horizontal_distance * azimuth.cos(),
            origin.elevation + self.base_point.instrument_height + height_difference
                - self.target_height,
        );

        if !point.is_finite() {
            return Err(ConversionError::DegenerateGeometry {
                reason: "resolved coordinate is not finite".to_string(),
            });
        }
        Ok(point)
    }

    fn offsets_from_elevation_change(&self) -> Result<(f64, f64), ConversionError> {
        let height_difference = self.vertical_value;
        let horizontal_distance = match self.distance_kind {
            DistanceKind::Horizontal => self.distance,
            DistanceKind::Slope => {
                let squared = self.distance.powi(2) - height_difference.powi(2);
                if squared < 0.0 {
                    return Err(ConversionError::DegenerateGeometry {
                        reason: format!(
                            "slope distance {} shorter than elevation change {}",
                            self.distance, height_difference
                        ),
                    });
                }
                squared.sqrt()
            }
        };
        Ok((horizontal_distance, height_difference))
    }
}
