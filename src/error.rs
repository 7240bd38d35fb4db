//! Error handling for RW5 processing operations.
//!
//! Provides error types with line and file context for record parsing,
//! unit resolution, geometric failures and output writing.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the pure angle/distance conversion functions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Degenerate angle {angle} ({unit}): divisor is zero")]
    DegenerateAngle { angle: f64, unit: String },

    #[error("Invalid bearing '{bearing}': {reason}")]
    InvalidBearing { bearing: String, reason: String },

    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },
}

#[derive(Error, Debug)]
pub enum Rw5Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Line {line}: {record_type} record found before any MO record, unit system is unknown")]
    MissingUnitSystem { line: usize, record_type: String },

    #[error("No MO record found in input, unit system is unknown")]
    NoUnitSystem,

    #[error("Line {line}: unsupported {field} unit code '{code}'")]
    UnsupportedUnitCode {
        line: usize,
        field: &'static str,
        code: String,
    },

    #[error("Line {line}: {source}")]
    Geometry {
        line: usize,
        #[source]
        source: ConversionError,
    },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

pub type Result<T> = std::result::Result<T, Rw5Error>;
