//! Tests for the survey stream processor
//!
//! Exercises both emission modes and the error policy on small RW5 jobs.

pub mod computed_tests;
pub mod raw_tests;

use crate::config::{EmissionMode, ProcessorConfig};
use crate::processor::{SurveyOutput, SurveyProcessor};

/// A small metric DMS job: two stored points, one station, a backsight and two shots
pub const SAMPLE_JOB: &str = "\
JB,NMSAMPLE,DT06-29-2001,TM13:27:39
MO,AD0,UN1,SF1.00000000,EC0,EO0.0,AU0
-- Setup on the first control point
SP,PN1,N 1000.0000,E 2000.0000,EL100.0000,--CP1
SP,PN2,N 1100.0000,E 2000.0000,EL101.0000,--CP2
OC,OP1,N 1000.0000,E 2000.0000,EL100.0000,--Station one
LS,HI1.5000,HR1.5000
BK,OP1,BP2,BS0.0000,BC0.0000
SS,OP1,FP10,AR90.0000,ZE90.0000,SD10.0000,--Fence
SS,OP1,FP11,AR0.0000,ZE90.0000,SD20.0000,--Tree
";

/// Metric DMS unit header used by hand-built jobs
pub const METRIC_HEADER: &str = "MO,AD0,UN1,SF1.00000000,EC0,EO0.0,AU0";

pub fn run(mode: EmissionMode, text: &str) -> SurveyOutput {
    SurveyProcessor::new(ProcessorConfig::default().with_mode(mode))
        .process_text(text)
        .expect("job should process")
}

pub fn job(lines: &[&str]) -> String {
    let mut text = String::from(METRIC_HEADER);
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }
    text
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
