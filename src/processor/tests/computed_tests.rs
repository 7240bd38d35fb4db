//! Computed-points mode tests

use super::{SAMPLE_JOB, close, job, run};
use crate::config::EmissionMode;
use crate::constants::UNKNOWN_STATION;
use crate::models::{AngleUnit, DistanceUnit, FeatureKind, Point, Severity, UnitSystem};

#[test]
fn test_sample_job_points() {
    let output = run(EmissionMode::Computed, SAMPLE_JOB);

    let kinds: Vec<FeatureKind> = output.features.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FeatureKind::Point,
            FeatureKind::Point,
            FeatureKind::Station,
            FeatureKind::Point,
            FeatureKind::Point,
        ]
    );
    assert_eq!(
        output.units,
        Some(UnitSystem {
            angle_unit: AngleUnit::Dms,
            distance_unit: DistanceUnit::Meter
        })
    );

    let fence = &output.features[3];
    assert_eq!(fence.point_name, "10");
    assert!(close(fence.geometry.easting, 2010.0));
    assert!(close(fence.geometry.northing, 1000.0));
    assert!(close(fence.geometry.elevation, 100.0));
    assert_eq!(fence.properties.notes, vec!["Fence".to_string()]);

    let tree = &output.features[4];
    assert!(close(tree.geometry.easting, 2000.0));
    assert!(close(tree.geometry.northing, 1020.0));
}

#[test]
fn test_sample_job_stats() {
    let output = run(EmissionMode::Computed, SAMPLE_JOB);

    assert_eq!(output.stats.lines_read, 10);
    assert_eq!(output.stats.comment_lines, 1);
    assert_eq!(output.stats.records_classified, 8);
    assert_eq!(output.stats.records_skipped, 1);
    assert_eq!(output.stats.features_emitted, 5);
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.line == 1 && d.severity == Severity::Info)
    );
}

#[test]
fn test_feature_ids_are_monotonic() {
    let output = run(EmissionMode::Computed, SAMPLE_JOB);
    let ids: Vec<u64> = output.features.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_station_properties() {
    let output = run(EmissionMode::Computed, SAMPLE_JOB);
    let station = &output.features[2];

    assert_eq!(station.point_name, "1");
    assert_eq!(station.geometry, Point::new(2000.0, 1000.0, 100.0));
    assert_eq!(station.properties.instrument_height, Some(1.5));
    assert_eq!(station.properties.distance_unit, Some(DistanceUnit::Meter));
    assert!(!station.properties.synthetic);
}

#[test]
fn test_identical_station_setups_deduplicated() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR0.0000",
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR0.0000",
    ]);
    let output = run(EmissionMode::Computed, &text);

    let stations = output.features.iter().filter(|f| f.is_station()).count();
    assert_eq!(stations, 1);
}

#[test]
fn test_moved_station_is_emitted_again() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR0.0000",
        "OC,OP1,N 5.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR0.0000",
        "OC,OP2,N 5.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR0.0000",
    ]);
    let output = run(EmissionMode::Computed, &text);

    let stations = output.features.iter().filter(|f| f.is_station()).count();
    assert_eq!(stations, 3);
}

#[test]
fn test_synthetic_station_fallback() {
    let text = job(&["LS,HI1.5000,HR0.0000"]);
    let output = run(EmissionMode::Computed, &text);

    assert_eq!(output.features.len(), 1);
    let station = &output.features[0];
    assert_eq!(station.kind, FeatureKind::Station);
    assert_eq!(station.point_name, "station_1");
    assert_eq!(station.geometry, UNKNOWN_STATION);
    assert!(station.properties.synthetic);
    assert_eq!(station.properties.notes, vec!["FAKE".to_string()]);
    assert_eq!(output.stats.synthetic_stations, 1);
}

#[test]
fn test_polar_resolution_end_to_end() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR0.0000",
        "SS,OP1,FP2,AR45.0000,ZE90.0000,SD10.0000",
    ]);
    let output = run(EmissionMode::Computed, &text);

    let point = output.features.last().unwrap();
    assert_eq!(point.kind, FeatureKind::Point);
    assert!((point.geometry.elevation - 1.5).abs() < 1e-9);
    let origin = Point::new(0.0, 0.0, 0.0);
    assert!((point.geometry.horizontal_distance_to(&origin) - 10.0).abs() < 1e-9);
}

#[test]
fn test_bearing_shot() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI0.0000,HR0.0000",
        "SS,OP1,FP2,BRS45.0000E,ZE90.0000,SD10.0000",
    ]);
    let output = run(EmissionMode::Computed, &text);

    let point = output.features.last().unwrap();
    let half = 10.0 / 2f64.sqrt();
    assert!(close(point.geometry.easting, half));
    assert!(close(point.geometry.northing, -half));
}

#[test]
fn test_vertical_angle_and_horizontal_distance() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL10.0000",
        "LS,HI1.0000,HR1.0000",
        "SS,OP1,FP2,AZ0.0000,VA30.0000,HD10.0000",
    ]);
    let output = run(EmissionMode::Computed, &text);

    let point = output.features.last().unwrap();
    assert!(close(point.geometry.northing, 10.0));
    assert!(close(point.geometry.elevation, 10.0 + 10.0 * 30f64.to_radians().tan()));
}

#[test]
fn test_gon_job() {
    let text = "MO,AD0,UN0,SF1.00000000,EC0,EO0.0,AU1\n\
                OC,OP1,N 0.0000,E 0.0000,EL0.0000\n\
                LS,HI0.0000,HR0.0000\n\
                SS,OP1,FP2,AR100.0000,ZE100.0000,SD10.0000";
    let output = run(EmissionMode::Computed, text);

    let point = output.features.last().unwrap();
    assert!(close(point.geometry.easting, 10.0));
    assert_eq!(point.properties.distance_unit, Some(DistanceUnit::Feet));
}

#[test]
fn test_shot_without_vertical_is_skipped() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.5000,HR0.0000",
        "SS,OP1,FP2,AR0.0000,SD10.0000",
    ]);
    let output = run(EmissionMode::Computed, &text);

    assert!(output.features.iter().all(|f| f.point_name != "2"));
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.line == 4 && d.severity == Severity::Warning)
    );
}

#[test]
fn test_shot_without_angle_defaults_to_north() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI0.0000,HR0.0000",
        "SS,OP1,FP2,ZE90.0000,SD10.0000",
    ]);
    let output = run(EmissionMode::Computed, &text);

    let point = output.features.last().unwrap();
    assert!(close(point.geometry.northing, 10.0));
    assert!(output.diagnostics.iter().any(|d| d.message.contains("horizontal angle")));
}

#[test]
fn test_shot_before_any_station_uses_sentinel() {
    let text = job(&["SS,OP9,FP2,AR0.0000,ZE90.0000,SD10.0000"]);
    let output = run(EmissionMode::Computed, &text);

    let point = output.features.last().unwrap();
    assert!(close(point.geometry.easting, UNKNOWN_STATION.easting));
    assert!(close(point.geometry.northing, UNKNOWN_STATION.northing + 10.0));
    assert!(output.diagnostics.iter().any(|d| d.message.contains("no known station")));
}

#[test]
fn test_commented_records_are_active() {
    let text = job(&[
        "--OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "--LS,HI1.0000,HR0.0000",
        "-- a free-text comment",
    ]);
    let output = run(EmissionMode::Computed, &text);

    assert_eq!(output.features.len(), 1);
    assert_eq!(output.stats.comment_lines, 1);
}

#[test]
fn test_sight_without_instrument_height_keeps_previous() {
    let text = job(&[
        "OC,OP1,N 0.0000,E 0.0000,EL0.0000",
        "LS,HI1.6000,HR2.0000",
        "LS,HR1.0000",
        "SS,OP1,FP2,AR0.0000,ZE90.0000,SD10.0000",
    ]);
    let output = run(EmissionMode::Computed, &text);

    let point = output.features.last().unwrap();
    assert!(close(point.geometry.elevation, 0.6));
}
