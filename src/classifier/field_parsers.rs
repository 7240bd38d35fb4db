//! Field parsing utilities for classified RW5 records
//!
//! Helper functions for pulling typed values out of a [`RawRecord`] field map
//! with consistent error reporting.

use super::grammar::RawRecord;
use super::record::RecordError;

/// Get a required field value from a raw record
pub fn get_required_field<'a>(record: &'a RawRecord, field_name: &'static str) -> Result<&'a str, RecordError> {
    get_optional_field(record, field_name).ok_or(RecordError::MissingField { field: field_name })
}

/// Get an optional field value from a raw record
pub fn get_optional_field<'a>(record: &'a RawRecord, field_name: &str) -> Option<&'a str> {
    record.fields.get(field_name).map(String::as_str)
}

/// Parse a required f64 field from a raw record
pub fn parse_required_f64(record: &RawRecord, field_name: &'static str) -> Result<f64, RecordError> {
    let value_str = get_required_field(record, field_name)?;
    parse_number(field_name, value_str)
}

/// Parse an optional f64 field; present but unparseable values are errors
pub fn parse_optional_f64(record: &RawRecord, field_name: &'static str) -> Result<Option<f64>, RecordError> {
    get_optional_field(record, field_name)
        .map(|value_str| parse_number(field_name, value_str))
        .transpose()
}

/// Parse a required string field from a raw record
pub fn parse_required_string(record: &RawRecord, field_name: &'static str) -> Result<String, RecordError> {
    get_required_field(record, field_name).map(str::to_string)
}

/// Parse an optional string field from a raw record
pub fn parse_optional_string(record: &RawRecord, field_name: &str) -> Option<String> {
    get_optional_field(record, field_name).map(str::to_string)
}

fn parse_number(field_name: &'static str, value_str: &str) -> Result<f64, RecordError> {
    // Collectors pad some numeric fields with inner spaces
    let compact: String = value_str.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RecordError::InvalidNumber {
            field: field_name,
            value: value_str.to_string(),
        })
}
