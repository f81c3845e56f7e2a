//! Per-invocation records and run reports.

use std::fmt;
use std::time::Duration;

use paramrun_core::ArgumentValue;

use crate::errors::{AggregationError, ConversionError};
use crate::invocation::ReportEntry;
use crate::source::ArgumentRow;

/// How one invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed,
    /// The test's own assertion did not hold (or it panicked)
    Failed(String),
    /// The row did not fit the declared parameters; the test was not called
    ConversionError(ConversionError),
    /// An aggregator rejected the row; the test was not called
    AggregationError(AggregationError),
    /// The test reported an error other than an assertion
    Errored(String),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// Upper-case status word used by reporters.
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASSED",
            Outcome::Failed(_) => "FAILED",
            Outcome::ConversionError(_) => "CONVERSION ERROR",
            Outcome::AggregationError(_) => "AGGREGATION ERROR",
            Outcome::Errored(_) => "ERROR",
        }
    }

    /// Failure description, `None` for a pass.
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Passed => None,
            Outcome::Failed(msg) | Outcome::Errored(msg) => Some(msg.clone()),
            Outcome::ConversionError(err) => Some(err.to_string()),
            Outcome::AggregationError(err) => Some(err.to_string()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(msg) => write!(f, "{}: {}", self.status(), msg),
            None => f.write_str(self.status()),
        }
    }
}

/// Result of running one row.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRecord {
    /// 1-based
    pub index: usize,
    pub display_name: String,
    pub row: ArgumentRow,
    /// Typed arguments, absent when conversion or aggregation failed
    pub arguments: Option<Vec<ArgumentValue>>,
    pub outcome: Outcome,
    pub entries: Vec<ReportEntry>,
    pub duration: Duration,
}

/// Every record of one definition, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub test_name: String,
    pub display_name: String,
    pub records: Vec<InvocationRecord>,
    pub duration: Duration,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.records.iter().map(|r| &r.outcome)
    }
}
