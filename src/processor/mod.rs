//! Survey stream processor.
//!
//! Folds the classified record sequence of one RW5 file, strictly in input
//! order, into an ordered feature stream. Two emission modes are supported:
//! computed points (final coordinates only) and raw observations (stations,
//! backsights and shots with their measured values).
//!
//! Degraded input is recovered locally and reported as a [`Diagnostic`].
//! Only a missing unit system, an unsupported unit code and, under
//! [`GeometryPolicy::Abort`](crate::config::GeometryPolicy), degenerate
//! geometry terminate a run.

mod computed;
mod raw;
mod state;

#[cfg(test)]
mod tests;

use crate::classifier::ModeRecord;
use crate::config::{EmissionMode, ProcessorConfig};
use crate::constants::{angle_unit_from_code, distance_unit_from_code};
use crate::error::{Result, Rw5Error};
use crate::models::{Diagnostic, Feature, ParseStats, UnitSystem};
use state::StreamState;
use tracing::debug;

/// Outcome of one processing pass
#[derive(Debug, Clone)]
pub struct SurveyOutput {
    pub mode: EmissionMode,
    pub features: Vec<Feature>,
    /// Always present for raw-observation output
    pub units: Option<UnitSystem>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ParseStats,
}

/// Processor for the Carlson RW5 record format
#[derive(Debug, Clone, Default)]
pub struct SurveyProcessor {
    config: ProcessorConfig,
}

impl SurveyProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Process lines in the configured emission mode
    pub fn process<'a, I>(&self, lines: I) -> Result<SurveyOutput>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let state = lines
            .into_iter()
            .enumerate()
            .try_fold(StreamState::new(&self.config), |state, (index, line)| {
                state.consume(index + 1, line)
            })?;

        let output = state.finish()?;
        debug!(
            "Processed {} lines into {} features ({} diagnostics)",
            output.stats.lines_read,
            output.features.len(),
            output.diagnostics.len()
        );
        Ok(output)
    }

    /// Process the full text of a file
    pub fn process_text(&self, text: &str) -> Result<SurveyOutput> {
        self.process(text.lines())
    }

    /// Final coordinates of every stored and observed point
    pub fn points(&self, text: &str) -> Result<Vec<Feature>> {
        let config = self.config.clone().with_mode(EmissionMode::Computed);
        Ok(SurveyProcessor::new(config).process_text(text)?.features)
    }

    /// Stations, backsights and observations plus the job's unit summary
    pub fn raw_observations(&self, text: &str) -> Result<(Vec<Feature>, UnitSystem)> {
        let config = self.config.clone().with_mode(EmissionMode::Raw);
        let output = SurveyProcessor::new(config).process_text(text)?;
        let units = output.units.ok_or(Rw5Error::NoUnitSystem)?;
        Ok((output.features, units))
    }
}

/// Resolve the unit codes of an MO record; unknown codes are fatal
fn resolve_units(line: usize, mode: &ModeRecord) -> Result<UnitSystem> {
    let angle_code = mode.angle_unit_code.as_deref().unwrap_or_default();
    let distance_code = mode.distance_unit_code.as_deref().unwrap_or_default();

    let angle_unit = angle_unit_from_code(angle_code).ok_or_else(|| Rw5Error::UnsupportedUnitCode {
        line,
        field: "AU",
        code: angle_code.to_string(),
    })?;
    let distance_unit =
        distance_unit_from_code(distance_code).ok_or_else(|| Rw5Error::UnsupportedUnitCode {
            line,
            field: "UN",
            code: distance_code.to_string(),
        })?;

    Ok(UnitSystem {
        angle_unit,
        distance_unit,
    })
}
