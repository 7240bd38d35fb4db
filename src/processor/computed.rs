//! Computed-points transitions: every shot is resolved to final coordinates.

use super::resolve_units;
use super::state::StreamState;
use crate::classifier::{HorizontalAngle, LineOfSightRecord, OccupyRecord, Record, ShotRecord, StorePointRecord};
use crate::config::GeometryPolicy;
use crate::constants::{SYNTHETIC_NOTE, UNKNOWN_STATION};
use crate::conversion::bearing_to_azimuth;
use crate::error::{Result, Rw5Error};
use crate::models::{BasePoint, FeatureKind, FeatureProperties, Severity, UnitSystem};
use crate::polar::PolarObservation;
use tracing::debug;

impl StreamState {
    pub(super) fn apply_computed(&mut self, line: usize, record: Record) -> Result<()> {
        if let Record::Mode(mode) = &record {
            let units = resolve_units(line, mode)?;
            self.set_units(line, units);
            return Ok(());
        }
        if let Record::Backsight(_) = record {
            debug!("Line {}: backsight ignored when computing points", line);
            return Ok(());
        }

        let units = self.require_units(line, &record)?;
        match record {
            Record::Occupy(occupy) => self.occupy_station(occupy),
            Record::LineOfSight(sight) => self.finalize_station(line, units, sight),
            Record::StorePoint(point) => self.store_point(units, point),
            Record::Shot(shot) => self.compute_shot(line, units, shot)?,
            Record::Mode(_) | Record::Backsight(_) => {}
        }
        Ok(())
    }

    fn occupy_station(&mut self, occupy: OccupyRecord) {
        self.registry.insert(occupy.station.clone(), occupy.position);
        self.stations
            .insert(occupy.station.clone(), BasePoint::new(occupy.position, 0.0));
        self.current_station = Some(occupy.station);
    }

    fn finalize_station(&mut self, line: usize, units: UnitSystem, sight: LineOfSightRecord) {
        if let Some(target_height) = sight.target_height {
            self.target_height = Some(target_height);
        }

        let (name, synthetic) = match self.current_station.clone() {
            Some(name) => (name, false),
            None => {
                self.diagnose(line, Severity::Info, "There is no known station".to_string());
                let name = self.synthesize_station_name();
                self.registry.insert(name.clone(), UNKNOWN_STATION);
                self.stations
                    .insert(name.clone(), BasePoint::new(UNKNOWN_STATION, 0.0));
                self.current_station = Some(name.clone());
                (name, true)
            }
        };

        let mut base = self
            .stations
            .get(&name)
            .copied()
            .unwrap_or_else(|| BasePoint::new(UNKNOWN_STATION, 0.0));
        match sight.instrument_height {
            Some(instrument_height) => base.instrument_height = instrument_height,
            None => {
                let message = format!("No instrument height for station {}", name);
                self.diagnose(line, Severity::Info, message);
            }
        }
        self.stations.insert(name.clone(), base);

        // Only a change of name or coordinates makes a new station
        let unchanged = self
            .last_station
            .as_ref()
            .is_some_and(|(last_name, last_position)| {
                *last_name == name && *last_position == base.position
            });
        if unchanged {
            return;
        }

        let properties = FeatureProperties {
            distance_unit: Some(units.distance_unit),
            instrument_height: Some(base.instrument_height),
            synthetic,
            notes: if synthetic {
                vec![SYNTHETIC_NOTE.to_string()]
            } else {
                Vec::new()
            },
            ..Default::default()
        };
        self.emit(FeatureKind::Station, name.clone(), base.position, properties);
        if synthetic {
            self.stats.synthetic_stations += 1;
        }
        self.last_station = Some((name, base.position));
    }

    fn store_point(&mut self, units: UnitSystem, point: StorePointRecord) {
        self.registry.insert(point.name.clone(), point.position);
        let properties = FeatureProperties {
            distance_unit: Some(units.distance_unit),
            notes: point.note.into_iter().collect(),
            ..Default::default()
        };
        self.emit(FeatureKind::Point, point.name, point.position, properties);
    }

    fn compute_shot(&mut self, line: usize, units: UnitSystem, shot: ShotRecord) -> Result<()> {
        let horizontal_angle = match &shot.horizontal {
            Some(HorizontalAngle::Azimuth(angle)) | Some(HorizontalAngle::Angle(angle)) => *angle,
            Some(HorizontalAngle::Bearing(bearing)) => {
                match bearing_to_azimuth(bearing, units.angle_unit) {
                    Ok(azimuth) => azimuth,
                    Err(e) => {
                        self.skip(line, Severity::Warning, format!("Shot to {} skipped: {}", shot.foresight, e));
                        return Ok(());
                    }
                }
            }
            None => {
                self.diagnose(line, Severity::Info, "There is no horizontal angle value".to_string());
                0.0
            }
        };
        let Some(vertical) = shot.vertical else {
            self.skip(line, Severity::Warning, format!("Shot to {} skipped: there is no vertical angle value", shot.foresight));
            return Ok(());
        };
        let Some(distance) = shot.distance else {
            self.skip(line, Severity::Warning, format!("Shot to {} skipped: there is no distance value", shot.foresight));
            return Ok(());
        };

        let target_height = match self.target_height {
            Some(target_height) => target_height,
            None => {
                self.diagnose(line, Severity::Info, "No target height recorded, using 0".to_string());
                0.0
            }
        };
        let base = self.base_point_for(line, &shot);

        let observation = PolarObservation {
            angle_unit: units.angle_unit,
            horizontal_angle,
            vertical_kind: vertical.kind,
            vertical_value: vertical.value,
            distance_kind: distance.kind,
            distance: distance.value,
            target_height,
            base_point: &base,
        };

        let point = match observation.resolve() {
            Ok(point) => point,
            Err(source) => match self.geometry_policy {
                GeometryPolicy::Abort => return Err(Rw5Error::Geometry { line, source }),
                GeometryPolicy::SkipShot => {
                    self.skip(line, Severity::Warning, format!("Shot to {} skipped: {}", shot.foresight, source));
                    return Ok(());
                }
            },
        };

        self.registry.insert(shot.foresight.clone(), point);
        let properties = FeatureProperties {
            distance_unit: Some(units.distance_unit),
            notes: shot.note.into_iter().collect(),
            ..Default::default()
        };
        self.emit(FeatureKind::Point, shot.foresight, point, properties);
        Ok(())
    }

    /// Anchor for a shot: the current station, else the station the shot
    /// names, else the unknown-station sentinel.
    fn base_point_for(&mut self, line: usize, shot: &ShotRecord) -> BasePoint {
        let known = self
            .current_station
            .as_ref()
            .or(shot.station.as_ref())
            .and_then(|name| self.stations.get(name))
            .copied();

        known.unwrap_or_else(|| {
            self.diagnose(line, Severity::Info, "There is no known station".to_string());
            BasePoint::new(UNKNOWN_STATION, 0.0)
        })
    }
}
