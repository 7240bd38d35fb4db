//! Per-type RW5 record grammars and line classification
//!
//! A line is first matched against the leading type pattern, which accepts
//! an optional `--` prefix marking a commented-out record. Commented records
//! are still active data and are classified exactly like plain ones. The
//! remainder of the line is then matched against the grammar of its type.

use crate::constants::record_codes;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

// =============================================================================
// Pre-compiled grammars
// =============================================================================

static RE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<comment>--)?(?P<type>\D{2}),").expect("valid type regex"));

static RE_MODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^,AD(?P<AD>[^,]*),UN(?P<UN>[\d. ]*),SF(?P<SF>[-\d. ]*),EC(?P<EC>[\d. ]*),EO(?P<EO>[-\d. ]*),AU(?P<AU>[\d. ]*)",
    )
    .expect("valid MO regex")
});

static RE_OCCUPY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^,OP(?P<OP>[^,]*),N (?P<N>[-\d. ]*),E (?P<E>[-\d. ]*),EL(?P<EL>[-\d. ]*)[,-]*(?P<note>.*)$",
    )
    .expect("valid OC regex")
});

static RE_LINE_OF_SIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:,HI(?P<HI>[-\d. ]*))?(?:,HR(?P<HR>[-\d. ]*))?(?:,.*)?$")
        .expect("valid LS regex")
});

static RE_BACKSIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^,OP(?P<OP>[^,]*),BP(?P<BP>[^,]*)(?:,BS(?P<BS>[-\d. ]*))?(?:,BC(?P<BC>[-\d. ]*))?(?:,.*)?$",
    )
    .expect("valid BK regex")
});

static RE_STORE_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^,PN(?P<PN>[^,]*),N (?P<N>[-\d. ]*),E (?P<E>[-\d. ]*),EL(?P<EL>[-\d. ]*)[,-]*(?P<note>.*)$",
    )
    .expect("valid SP regex")
});

static RE_SHOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^,OP(?P<OP>[^,]*),FP(?P<FP>[^,]*)",
        r"(?:,(?:(?:AR|AL|DL|DR)(?P<HA>[-\d. ]*)|BR(?P<BR>[NnSs][\d. ]*[EeWw])|AZ(?P<AZ>[-\d. ]*)))?",
        r"(?:,(?:ZE(?P<ZE>[-\d. ]*)|VA(?P<VA>[-\d. ]*)|CE(?P<CE>[-\d. ]*)))?",
        r"(?:,(?:SD(?P<SD>[-\d. ]*)|HD(?P<HD>[-\d. ]*)))?",
        r"(?:,-*(?P<note>.*))?$",
    ))
    .expect("valid shot regex")
});

// A shot note that opens with a measurement tag is a field the grammar could not read
static RE_STRAY_MEASUREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:AR|AL|DL|DR|BR|AZ|ZE|VA|CE|SD|HD)")
        .expect("valid measurement tag regex")
});

/// Instrument semantics of a shot record; all share one grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotType {
    SideShot,
    Traverse,
    BacksightDirect,
    BacksightReverse,
    ForesightDirect,
    ForesightReverse,
}

/// Record types the classifier has a grammar for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Mode,
    Occupy,
    LineOfSight,
    Backsight,
    StorePoint,
    Shot(ShotType),
}

impl RecordType {
    pub fn from_code(code: &str) -> Option<Self> {
        let record_type = match code {
            record_codes::MODE => RecordType::Mode,
            record_codes::OCCUPY => RecordType::Occupy,
            record_codes::LINE_OF_SIGHT => RecordType::LineOfSight,
            record_codes::BACKSIGHT => RecordType::Backsight,
            record_codes::STORE_POINT => RecordType::StorePoint,
            record_codes::SIDE_SHOT => RecordType::Shot(ShotType::SideShot),
            record_codes::TRAVERSE => RecordType::Shot(ShotType::Traverse),
            record_codes::BACKSIGHT_DIRECT => RecordType::Shot(ShotType::BacksightDirect),
            record_codes::BACKSIGHT_REVERSE => RecordType::Shot(ShotType::BacksightReverse),
            record_codes::FORESIGHT_DIRECT => RecordType::Shot(ShotType::ForesightDirect),
            record_codes::FORESIGHT_REVERSE => RecordType::Shot(ShotType::ForesightReverse),
            _ => return None,
        };
        Some(record_type)
    }

    pub fn code(&self) -> &'static str {
        match self {
            RecordType::Mode => record_codes::MODE,
            RecordType::Occupy => record_codes::OCCUPY,
            RecordType::LineOfSight => record_codes::LINE_OF_SIGHT,
            RecordType::Backsight => record_codes::BACKSIGHT,
            RecordType::StorePoint => record_codes::STORE_POINT,
            RecordType::Shot(ShotType::SideShot) => record_codes::SIDE_SHOT,
            RecordType::Shot(ShotType::Traverse) => record_codes::TRAVERSE,
            RecordType::Shot(ShotType::BacksightDirect) => record_codes::BACKSIGHT_DIRECT,
            RecordType::Shot(ShotType::BacksightReverse) => record_codes::BACKSIGHT_REVERSE,
            RecordType::Shot(ShotType::ForesightDirect) => record_codes::FORESIGHT_DIRECT,
            RecordType::Shot(ShotType::ForesightReverse) => record_codes::FORESIGHT_REVERSE,
        }
    }

    fn grammar(&self) -> &'static Regex {
        match self {
            RecordType::Mode => &RE_MODE,
            RecordType::Occupy => &RE_OCCUPY,
            RecordType::LineOfSight => &RE_LINE_OF_SIGHT,
            RecordType::Backsight => &RE_BACKSIGHT,
            RecordType::StorePoint => &RE_STORE_POINT,
            RecordType::Shot(_) => &RE_SHOT,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A line matched against its type grammar, before numeric typing
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub record_type: RecordType,
    /// The line carried the `--` commented-record prefix
    pub commented: bool,
    /// Only fields present in the line; values are trimmed and never empty
    pub fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn has(&self, field_name: &str) -> bool {
        self.fields.contains_key(field_name)
    }
}

/// Outcome of classifying one line
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Record(RawRecord),
    /// Syntactically valid two-letter type with no grammar
    UnknownType { code: String },
    /// Known type whose grammar rejected the line
    Malformed { record_type: RecordType },
    /// No leading type at all (blank lines, stray text)
    NotARecord,
}

/// Classify one line, which must already exclude free-text comment lines
pub fn classify(line: &str) -> Classification {
    let line = line.trim_end_matches(['\r', '\n']);

    let Some(caps) = RE_TYPE.captures(line) else {
        return Classification::NotARecord;
    };
    let code = &caps["type"];
    let commented = caps.name("comment").is_some();

    let Some(record_type) = RecordType::from_code(code) else {
        return Classification::UnknownType {
            code: code.to_string(),
        };
    };

    // Grammars start at the comma following the type code
    let body_start = caps.get(0).map_or(0, |m| m.end() - 1);
    let body = &line[body_start..];

    let grammar = record_type.grammar();
    let Some(fields_caps) = grammar.captures(body) else {
        debug!("{} record did not match its grammar: {}", record_type, line);
        return Classification::Malformed { record_type };
    };

    if let RecordType::Shot(_) = record_type {
        // Notes introduced with dashes are free text
        let stray = fields_caps.name("note").is_some_and(|note| {
            body[..note.start()].ends_with(',') && RE_STRAY_MEASUREMENT.is_match(note.as_str())
        });
        if stray {
            debug!("{} record has an unreadable measurement: {}", record_type, line);
            return Classification::Malformed { record_type };
        }
    }

    let fields: BTreeMap<String, String> = grammar
        .capture_names()
        .flatten()
        .filter_map(|name| {
            fields_caps
                .name(name)
                .map(|m| m.as_str().trim())
                .filter(|value| !value.is_empty())
                .map(|value| (name.to_string(), value.to_string()))
        })
        .collect();

    Classification::Record(RawRecord {
        record_type,
        commented,
        fields,
    })
}

/// Convenience form returning only recognized records
pub fn classify_line(line: &str) -> Option<RawRecord> {
    match classify(line) {
        Classification::Record(record) => Some(record),
        _ => None,
    }
}
