//! Raw-observation mode tests

use super::{SAMPLE_JOB, job, run};
use crate::config::{EmissionMode, ProcessorConfig};
use crate::constants::{UNKNOWN_POINT, UNKNOWN_STATION};
use crate::error::Rw5Error;
use crate::models::{
    AngleUnit, DistanceKind, DistanceUnit, FeatureKind, Point, VerticalKind,
};
use crate::processor::SurveyProcessor;

#[test]
fn test_sample_job_observations() {
    let output = run(EmissionMode::Raw, SAMPLE_JOB);

    let kinds: Vec<FeatureKind> = output.features.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FeatureKind::Point,
            FeatureKind::Point,
            FeatureKind::Station,
            FeatureKind::Backsight,
            FeatureKind::PolarObservation,
            FeatureKind::PolarObservation,
        ]
    );

    let fence = &output.features[4];
    assert_eq!(fence.point_name, "10");
    assert_eq!(fence.geometry, UNKNOWN_POINT);
    assert_eq!(fence.properties.station_name.as_deref(), Some("1"));
    assert_eq!(fence.properties.horizontal_angle, Some(90.0));
    assert_eq!(fence.properties.azimuth, Some(0.0));
    assert_eq!(fence.properties.vertical_value, Some(90.0));
    assert_eq!(fence.properties.vertical_kind, Some(VerticalKind::Zenithal));
    assert_eq!(fence.properties.distance, Some(10.0));
    assert_eq!(fence.properties.distance_kind, Some(DistanceKind::Slope));
    assert_eq!(fence.properties.target_height, Some(1.5));
    assert_eq!(fence.properties.angle_unit, Some(AngleUnit::Dms));
}

#[test]
fn test_backsight_resolves_known_point() {
    let output = run(EmissionMode::Raw, SAMPLE_JOB);
    let backsight = &output.features[3];

    assert_eq!(backsight.point_name, "2");
    assert_eq!(backsight.geometry, Point::new(2000.0, 1100.0, 101.0));
    assert_eq!(backsight.properties.station_name.as_deref(), Some("1"));
    assert_eq!(backsight.properties.azimuth, Some(0.0));
    assert_eq!(backsight.properties.circle, Some(0.0));
}

#[test]
fn test_backsight_unknown_point_uses_sentinel() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "BK,OP1,BP99,BS10.0000,BC0.0000",
    ]);
    let output = run(EmissionMode::Raw, &text);

    let backsight = output.features.last().unwrap();
    assert_eq!(backsight.kind, FeatureKind::Backsight);
    assert_eq!(backsight.geometry, UNKNOWN_POINT);
    assert!(output.diagnostics.iter().any(|d| d.message.contains("99")));
}

#[test]
fn test_instrument_height_backfilled_in_place() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000,--Hub",
        "LS,HI1.6000,HR2.0000",
    ]);
    let output = run(EmissionMode::Raw, &text);

    assert_eq!(output.features.len(), 1);
    let station = &output.features[0];
    assert_eq!(station.properties.instrument_height, Some(1.6));
    assert!(!station.properties.default_instrument_height);
    assert_eq!(station.properties.notes, vec!["Hub".to_string()]);
}

#[test]
fn test_station_without_sight_keeps_placeholder() {
    let text = job(&["OC,OP1,N 0.0000,E 0.0000,EL0.0000"]);
    let output = run(EmissionMode::Raw, &text);

    let station = &output.features[0];
    assert_eq!(station.properties.instrument_height, Some(0.0));
    assert!(station.properties.default_instrument_height);
}

#[test]
fn test_changed_instrument_height_emits_new_station() {
    let text = job(&[
        "OC,OP1,N 3.0000,E 4.0000,EL5.0000",
        "LS,HI1.6000,HR2.0000",
        "LS,HI1.6000,HR2.0000",
        "LS,HI1.7000,HR2.0000",
    ]);
    let output = run(EmissionMode::Raw, &text);

    let stations: Vec<_> = output.features.iter().filter(|f| f.is_station()).collect();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].properties.instrument_height, Some(1.6));
    assert_eq!(stations[1].properties.instrument_height, Some(1.7));
    assert_eq!(stations[1].geometry, stations[0].geometry);
    assert_eq!(stations[1].point_name, "1");
}

#[test]
fn test_synthetic_station_fallback() {
    let text = job(&["LS,HI1.5000,HR0.0000"]);
    let output = run(EmissionMode::Raw, &text);

    assert_eq!(output.features.len(), 1);
    let station = &output.features[0];
    assert_eq!(station.point_name, "station_1");
    assert_eq!(station.geometry, UNKNOWN_STATION);
    assert_eq!(station.properties.instrument_height, Some(1.5));
    assert!(station.properties.synthetic);
}

#[test]
fn test_bearing_observation_converted() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR1.5000",
        "SS,OP1,FP2,BRN45.0000W,CE1.2000,HD12.0000",
    ]);
    let output = run(EmissionMode::Raw, &text);

    let observation = output.features.last().unwrap();
    assert_eq!(observation.properties.horizontal_angle, Some(315.0));
    assert_eq!(
        observation.properties.vertical_kind,
        Some(VerticalKind::ChangeInElevation)
    );
    assert_eq!(
        observation.properties.distance_kind,
        Some(DistanceKind::Horizontal)
    );
}

#[test]
fn test_observation_without_station_gets_generated_name() {
    let text = job(&["SS,OP,FP2,AZ10.0000,ZE90.0000,SD5.0000"]);
    let output = run(EmissionMode::Raw, &text);

    let observation = output.features.last().unwrap();
    assert_eq!(observation.properties.station_name.as_deref(), Some("station_1"));
    assert_eq!(observation.properties.azimuth, Some(10.0));
    assert_eq!(observation.properties.horizontal_angle, Some(0.0));
}

#[test]
fn test_observation_of_stored_point_keeps_coordinates() {
    let text = job(&[
        "SP,PN5,N 10.0000,E 20.0000,EL3.0000",
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR1.5000",
        "SS,OP1,FP5,AR0.0000,ZE90.0000,SD10.0000",
    ]);
    let output = run(EmissionMode::Raw, &text);

    let observation = output.features.last().unwrap();
    assert_eq!(observation.geometry, Point::new(20.0, 10.0, 3.0));
}

#[test]
fn test_raw_observations_unit_summary() {
    let processor = SurveyProcessor::new(ProcessorConfig::default());
    let (features, units) = processor.raw_observations(SAMPLE_JOB).unwrap();

    assert_eq!(features.len(), 6);
    assert_eq!(units.angle_unit, AngleUnit::Dms);
    assert_eq!(units.distance_unit, DistanceUnit::Meter);
}

#[test]
fn test_raw_mode_requires_unit_system() {
    let processor = SurveyProcessor::new(ProcessorConfig::default());
    let result = processor.raw_observations("-- empty job\n");
    assert!(matches!(result, Err(Rw5Error::NoUnitSystem)));
}

#[test]
fn test_sight_without_instrument_height_keeps_station() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.6000,HR2.0000",
        "LS,HR1.0000",
        "SS,OP1,FP2,AR0.0000,ZE90.0000,SD10.0000",
    ]);
    let output = run(EmissionMode::Raw, &text);

    let heights: Vec<Option<f64>> = output
        .features
        .iter()
        .filter(|f| f.is_station())
        .map(|f| f.properties.instrument_height)
        .collect();
    assert_eq!(heights, vec![Some(1.6)]);

    let observation = output.features.last().unwrap();
    assert_eq!(observation.properties.target_height, Some(1.0));
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.line == 4 && d.message.contains("No instrument height"))
    );
}

#[test]
fn test_unreadable_shot_measurement_is_skipped() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR1.5000",
        "SS,OP1,FP2,AR9O.0000,ZE90.0000,SD10.0000",
    ]);
    let output = run(EmissionMode::Raw, &text);

    assert_eq!(output.stats.records_skipped, 1);
    assert!(output.features.iter().all(|f| f.kind != FeatureKind::PolarObservation));
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.line == 4 && d.severity == crate::models::Severity::Warning)
    );
}
