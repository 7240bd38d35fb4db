//! Raw-observation transitions: stations, backsights and shots are emitted
//! with their measured values so output collaborators keep full provenance.
//!
//! Station features are index-addressable in the output buffer. An occupy
//! record emits its station with a placeholder instrument height; the next
//! line-of-sight record for that station rewrites the height in place and
//! clears the placeholder flag. Any later height change emits a new station
//! feature at the same coordinates instead of rewriting history.

use super::resolve_units;
use super::state::StreamState;
use crate::classifier::{
    BacksightRecord, HorizontalAngle, LineOfSightRecord, OccupyRecord, Record, ShotRecord,
    StorePointRecord,
};
use crate::constants::{SYNTHETIC_NOTE, UNKNOWN_POINT, UNKNOWN_STATION};
use crate::conversion::bearing_to_azimuth;
use crate::error::Result;
use crate::models::{BasePoint, FeatureKind, FeatureProperties, Point, Severity, UnitSystem};

impl StreamState {
    pub(super) fn apply_raw(&mut self, line: usize, record: Record) -> Result<()> {
        if let Record::Mode(mode) = &record {
            let units = resolve_units(line, mode)?;
            self.set_units(line, units);
            return Ok(());
        }

        let units = self.require_units(line, &record)?;
        match record {
            Record::Occupy(occupy) => self.open_station(units, occupy),
            Record::LineOfSight(sight) => self.update_station_height(line, units, sight),
            Record::Backsight(backsight) => self.record_backsight(line, units, backsight),
            Record::StorePoint(point) => self.store_raw_point(units, point),
            Record::Shot(shot) => self.record_observation(line, units, shot),
            Record::Mode(_) => {}
        }
        Ok(())
    }

    fn station_properties(&self, units: UnitSystem, instrument_height: f64) -> FeatureProperties {
        FeatureProperties {
            angle_unit: Some(units.angle_unit),
            distance_unit: Some(units.distance_unit),
            instrument_height: Some(instrument_height),
            ..Default::default()
        }
    }

    fn open_station(&mut self, units: UnitSystem, occupy: OccupyRecord) {
        self.registry.insert(occupy.station.clone(), occupy.position);
        self.stations
            .insert(occupy.station.clone(), BasePoint::new(occupy.position, 0.0));

        let properties = FeatureProperties {
            notes: occupy.note.into_iter().collect(),
            default_instrument_height: true,
            ..self.station_properties(units, 0.0)
        };
        let index = self.emit(FeatureKind::Station, occupy.station.clone(), occupy.position, properties);
        self.station_features.insert(occupy.station.clone(), index);
        self.current_station = Some(occupy.station);
    }

    fn update_station_height(&mut self, line: usize, units: UnitSystem, sight: LineOfSightRecord) {
        if let Some(target_height) = sight.target_height {
            self.target_height = Some(target_height);
        }

        let Some(name) = self.current_station.clone() else {
            self.diagnose(line, Severity::Info, "There is no known station".to_string());
            let instrument_height = sight.instrument_height.unwrap_or_else(|| {
                self.diagnose(line, Severity::Info, "No instrument height, using 0".to_string());
                0.0
            });
            let name = self.synthesize_station_name();
            self.registry.insert(name.clone(), UNKNOWN_STATION);
            self.stations.insert(
                name.clone(),
                BasePoint::new(UNKNOWN_STATION, instrument_height),
            );
            let properties = FeatureProperties {
                synthetic: true,
                notes: vec![SYNTHETIC_NOTE.to_string()],
                ..self.station_properties(units, instrument_height)
            };
            let index = self.emit(FeatureKind::Station, name.clone(), UNKNOWN_STATION, properties);
            self.stats.synthetic_stations += 1;
            self.station_features.insert(name.clone(), index);
            self.current_station = Some(name);
            return;
        };

        // A sight without HI only changes the target height
        let Some(instrument_height) = sight.instrument_height else {
            let message = format!("No instrument height for station {}, keeping the current one", name);
            self.diagnose(line, Severity::Info, message);
            return;
        };

        if let Some(base) = self.stations.get_mut(&name) {
            base.instrument_height = instrument_height;
        }

        let Some(&index) = self.station_features.get(&name) else {
            let position = self.registry.get(&name).copied().unwrap_or(UNKNOWN_STATION);
            let properties = self.station_properties(units, instrument_height);
            let index = self.emit(FeatureKind::Station, name.clone(), position, properties);
            self.station_features.insert(name, index);
            return;
        };

        let station = &mut self.features[index];
        if station.properties.default_instrument_height {
            station.properties.instrument_height = Some(instrument_height);
            station.properties.default_instrument_height = false;
        } else if station.properties.instrument_height != Some(instrument_height) {
            let position = station.geometry;
            let properties = self.station_properties(units, instrument_height);
            let index = self.emit(FeatureKind::Station, name.clone(), position, properties);
            self.station_features.insert(name, index);
        }
    }

    fn record_backsight(&mut self, line: usize, units: UnitSystem, backsight: BacksightRecord) {
        let position = self.lookup_point(line, &backsight.backsight_point);
        let properties = FeatureProperties {
            angle_unit: Some(units.angle_unit),
            circle: backsight.circle,
            azimuth: backsight.azimuth,
            station_name: backsight.station.or_else(|| self.current_station.clone()),
            ..Default::default()
        };
        self.emit(FeatureKind::Backsight, backsight.backsight_point, position, properties);
    }

    fn store_raw_point(&mut self, units: UnitSystem, point: StorePointRecord) {
        self.registry.insert(point.name.clone(), point.position);
        let properties = FeatureProperties {
            distance_unit: Some(units.distance_unit),
            notes: point.note.into_iter().collect(),
            ..Default::default()
        };
        self.emit(FeatureKind::Point, point.name, point.position, properties);
    }

    fn record_observation(&mut self, line: usize, units: UnitSystem, shot: ShotRecord) {
        let azimuth = match &shot.horizontal {
            Some(HorizontalAngle::Azimuth(azimuth)) => *azimuth,
            _ => 0.0,
        };
        let angle = match &shot.horizontal {
            Some(HorizontalAngle::Angle(angle)) => *angle,
            Some(HorizontalAngle::Bearing(bearing)) => {
                match bearing_to_azimuth(bearing, units.angle_unit) {
                    Ok(angle) => angle,
                    Err(e) => {
                        self.diagnose(line, Severity::Warning, format!("{}, using 0", e));
                        0.0
                    }
                }
            }
            Some(HorizontalAngle::Azimuth(_)) => 0.0,
            None => {
                self.diagnose(line, Severity::Info, "There is no horizontal angle value".to_string());
                0.0
            }
        };
        if shot.vertical.is_none() {
            self.diagnose(line, Severity::Warning, "There is no vertical angle value".to_string());
        }
        if shot.distance.is_none() {
            self.diagnose(line, Severity::Warning, "There is no distance value".to_string());
        }

        let target_height = self.target_height.unwrap_or_else(|| {
            self.diagnose(line, Severity::Info, "No target height recorded, using 0".to_string());
            0.0
        });
        let position = self.lookup_point(line, &shot.foresight);
        let station_name = match shot.station {
            Some(name) => name,
            None => {
                self.diagnose(line, Severity::Info, "There is no known station".to_string());
                self.synthesize_station_name()
            }
        };

        let properties = FeatureProperties {
            angle_unit: Some(units.angle_unit),
            distance_unit: Some(units.distance_unit),
            azimuth: Some(azimuth),
            horizontal_angle: Some(angle),
            vertical_value: shot.vertical.map(|v| v.value),
            vertical_kind: shot.vertical.map(|v| v.kind),
            distance: shot.distance.map(|d| d.value),
            distance_kind: shot.distance.map(|d| d.kind),
            target_height: Some(target_height),
            station_name: Some(station_name),
            notes: shot.note.into_iter().collect(),
            ..Default::default()
        };
        self.emit(FeatureKind::PolarObservation, shot.foresight, position, properties);
    }

    fn lookup_point(&mut self, line: usize, name: &str) -> Point {
        if let Some(point) = self.registry.get(name).copied() {
            return point;
        }
        self.diagnose(line, Severity::Info, format!("There is no known point {}", name));
        UNKNOWN_POINT
    }
}
