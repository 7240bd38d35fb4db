//! RW5 Processor Library
//!
//! A Rust library for converting Carlson RW5 total-station field logs into
//! point features, either as final coordinates or as raw observations.
//!
//! This library provides tools for:
//! - Converting angles between DMS, gon, mil, degrees and radians
//! - Classifying RW5 lines into typed records
//! - Resolving polar observations into coordinates
//! - Folding a record stream into computed points or raw observations
//! - Writing feature tables as Parquet or CSV
//!
//! # Example
//!
//! ```
//! use rw5_processor::SurveyProcessor;
//!
//! let job = "MO,AD0,UN1,SF1.00000000,EC0,EO0.0,AU0\n\
//!            OC,OP1,N 0.0000,E 0.0000,EL0.0000\n\
//!            LS,HI1.5000,HR1.5000\n\
//!            SS,OP1,FP2,AR0.0000,ZE90.0000,SD10.0000";
//! let points = SurveyProcessor::default().points(job).unwrap();
//! assert_eq!(points.len(), 2);
//! ```

pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod error;
pub mod models;
pub mod polar;
pub mod processor;
pub mod runner;
pub mod writer;

pub use config::{EmissionMode, ProcessorConfig};
pub use error::{ConversionError, Result, Rw5Error};
pub use models::{AngleUnit, DistanceUnit, Feature, FeatureKind, Point, UnitSystem};
pub use processor::{SurveyOutput, SurveyProcessor};
