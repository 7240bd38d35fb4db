//! RW5 record classifier
//!
//! Turns loosely structured, comma-delimited RW5 lines into typed records.
//!
//! ## Architecture
//!
//! - [`grammar`] - Leading type detection and per-type field grammars
//! - [`record`] - Typed record variants built from classified field maps
//! - [`field_parsers`] - Utility functions for field extraction and parsing
//!
//! ## Usage
//!
//! ```rust
//! use rw5_processor::classifier::{classify_line, Record};
//!
//! let raw = classify_line("OC,OP1,N 5000.000,E 5000.000,EL100.000,--CP").unwrap();
//! let record = Record::try_from(&raw).unwrap();
//! assert!(matches!(record, Record::Occupy(_)));
//! ```

pub mod field_parsers;
pub mod grammar;
pub mod record;

#[cfg(test)]
pub mod tests;

pub use grammar::{Classification, RawRecord, RecordType, ShotType, classify, classify_line};
pub use record::{
    BacksightRecord, Distance, HorizontalAngle, LineOfSightRecord, ModeRecord, OccupyRecord,
    Record, RecordError, ShotRecord, StorePointRecord, VerticalValue,
};
