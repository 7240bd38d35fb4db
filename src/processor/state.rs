//! Running state of one survey stream pass.
//!
//! All context that records refer to positionally (units, current station,
//! registries, target height) lives here as explicit optional fields. One
//! state value is owned by exactly one pass over one file.

use super::SurveyOutput;
use crate::classifier::{Classification, Record, classify};
use crate::config::{EmissionMode, GeometryPolicy, ProcessorConfig};
use crate::constants::SYNTHETIC_STATION_PREFIX;
use crate::error::{Result, Rw5Error};
use crate::models::{
    BasePoint, Diagnostic, Feature, FeatureKind, FeatureProperties, ParseStats, Point, Severity,
    UnitSystem,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub(crate) struct StreamState {
    pub(super) mode: EmissionMode,
    pub(super) geometry_policy: GeometryPolicy,
    comment_prefix: String,

    pub(super) units: Option<UnitSystem>,
    pub(super) current_station: Option<String>,
    pub(super) target_height: Option<f64>,
    /// Station anchors by name
    pub(super) stations: HashMap<String, BasePoint>,
    /// Most recent coordinate recorded for each point or station name
    pub(super) registry: HashMap<String, Point>,
    /// Name and position of the last emitted station (computed mode)
    pub(super) last_station: Option<(String, Point)>,
    /// Index into `features` of the latest station feature per name (raw mode)
    pub(super) station_features: HashMap<String, usize>,

    next_id: u64,
    synthetic_count: usize,

    pub(super) features: Vec<Feature>,
    diagnostics: Vec<Diagnostic>,
    pub(super) stats: ParseStats,
}

impl StreamState {
    pub(super) fn new(config: &ProcessorConfig) -> Self {
        Self {
            mode: config.mode,
            geometry_policy: config.geometry_policy,
            comment_prefix: config.comment_prefix.clone(),
            units: None,
            current_station: None,
            target_height: None,
            stations: HashMap::new(),
            registry: HashMap::new(),
            last_station: None,
            station_features: HashMap::new(),
            next_id: 0,
            synthetic_count: 0,
            features: Vec::new(),
            diagnostics: Vec::new(),
            stats: ParseStats::default(),
        }
    }

    /// Fold one source line into the state
    pub(super) fn consume(mut self, line_number: usize, line: &str) -> Result<Self> {
        self.stats.lines_read += 1;

        if line.starts_with(&self.comment_prefix) {
            self.stats.comment_lines += 1;
            return Ok(self);
        }

        match classify(line) {
            Classification::Record(raw) => match Record::try_from(&raw) {
                Ok(record) => {
                    self.stats.records_classified += 1;
                    debug!("Line {}: {:?}", line_number, record);
                    match self.mode {
                        EmissionMode::Computed => self.apply_computed(line_number, record)?,
                        EmissionMode::Raw => self.apply_raw(line_number, record)?,
                    }
                }
                Err(e) => {
                    self.skip(line_number, Severity::Warning, format!("{} record skipped: {}", raw.record_type, e));
                }
            },
            Classification::UnknownType { code } => {
                self.skip(line_number, Severity::Info, format!("Type \"{}\" is not used for now", code));
            }
            Classification::Malformed { record_type } => {
                self.skip(
                    line_number,
                    Severity::Warning,
                    format!("{} record does not match the {} grammar", record_type, record_type),
                );
            }
            Classification::NotARecord => {
                if !line.trim().is_empty() {
                    self.skip(line_number, Severity::Info, "Line is not an RW5 record".to_string());
                }
            }
        }

        Ok(self)
    }

    pub(super) fn finish(self) -> Result<SurveyOutput> {
        if self.mode == EmissionMode::Raw && self.units.is_none() {
            return Err(Rw5Error::NoUnitSystem);
        }
        Ok(SurveyOutput {
            mode: self.mode,
            features: self.features,
            units: self.units,
            diagnostics: self.diagnostics,
            stats: self.stats,
        })
    }

    /// Units of the job; a coordinate-bearing record before any MO is fatal
    pub(super) fn require_units(&self, line_number: usize, record: &Record) -> Result<UnitSystem> {
        self.units.ok_or_else(|| Rw5Error::MissingUnitSystem {
            line: line_number,
            record_type: record.record_type().code().to_string(),
        })
    }

    pub(super) fn set_units(&mut self, line_number: usize, units: UnitSystem) {
        if let Some(previous) = self.units.filter(|previous| *previous != units) {
            self.diagnose(
                line_number,
                Severity::Info,
                format!(
                    "Unit system changed from {}/{} to {}/{}",
                    previous.angle_unit, previous.distance_unit, units.angle_unit, units.distance_unit
                ),
            );
        }
        debug!(
            "Line {}: angle unit {}, distance unit {}",
            line_number, units.angle_unit, units.distance_unit
        );
        self.units = Some(units);
    }

    /// Append a feature, returning its index in the output buffer
    pub(super) fn emit(
        &mut self,
        kind: FeatureKind,
        point_name: impl Into<String>,
        geometry: Point,
        properties: FeatureProperties,
    ) -> usize {
        let feature = Feature::new(self.next_id, kind, point_name, geometry, properties);
        self.next_id += 1;
        self.features.push(feature);
        self.stats.features_emitted += 1;
        self.features.len() - 1
    }

    /// Generate a unique name for a station that was never occupied
    pub(super) fn synthesize_station_name(&mut self) -> String {
        self.synthetic_count += 1;
        format!("{}{}", SYNTHETIC_STATION_PREFIX, self.synthetic_count)
    }

    pub(super) fn diagnose(&mut self, line_number: usize, severity: Severity, message: String) {
        match severity {
            Severity::Info => info!("Line {}: {}", line_number, message),
            Severity::Warning => warn!("Line {}: {}", line_number, message),
        }
        self.diagnostics.push(Diagnostic {
            line: line_number,
            severity,
            message,
        });
    }

    /// Record a diagnostic for a line that produced nothing
    pub(super) fn skip(&mut self, line_number: usize, severity: Severity, message: String) {
        self.stats.records_skipped += 1;
        self.diagnose(line_number, severity, message);
    }
}
