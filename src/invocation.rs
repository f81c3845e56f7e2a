//! What a test function sees when it runs.
//!
//! An [`Invocation`] carries the typed arguments of one row plus the context objects the definition declared.

use std::cell::RefCell;

use chrono::{NaiveDate, NaiveDateTime};
use paramrun_core::ArgumentValue;

use crate::errors::TestFailure;

/// Metadata about the current invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInfo {
    pub display_name: String,
    /// 1-based
    pub index: usize,
    pub test_name: String,
}

/// One key/value pair published by a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub key: String,
    pub value: String,
}

/// Write-only sink for key/value entries.
#[derive(Debug, Default)]
pub struct Reporter {
    entries: RefCell<Vec<ReportEntry>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish_entry(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.borrow_mut().push(ReportEntry {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Publish under the key `value`.
    pub fn publish(&self, value: impl Into<String>) {
        self.publish_entry("value", value);
    }

    pub(crate) fn into_entries(self) -> Vec<ReportEntry> {
        self.entries.into_inner()
    }
}

/// Extract a Rust value from an argument.
pub trait FromArgument: Sized {
    fn from_argument(value: &ArgumentValue) -> Option<Self>;
}

impl FromArgument for ArgumentValue {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromArgument for String {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Str(s) => Some(s.clone()),
            ArgumentValue::Enum { member, .. } => Some(member.clone()),
            _ => None,
        }
    }
}

impl FromArgument for i64 {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromArgument for f64 {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Float(f) => Some(*f),
            ArgumentValue::Int(i) => ArgumentValue::int_as_exact_float(*i),
            _ => None,
        }
    }
}

impl FromArgument for bool {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromArgument for char {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Char(c) => Some(*c),
            _ => None,
        }
    }
}

impl FromArgument for NaiveDateTime {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl FromArgument for NaiveDate {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// `None` for null, otherwise the inner conversion.
impl<T: FromArgument> FromArgument for Option<T> {
    fn from_argument(value: &ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Null => Some(None),
            other => T::from_argument(other).map(Some),
        }
    }
}

/// Arguments and context for one call of a test function.
pub struct Invocation<'a> {
    arguments: &'a [ArgumentValue],
    info: Option<&'a TestInfo>,
    reporter: Option<&'a Reporter>,
}

impl<'a> Invocation<'a> {
    pub fn new(arguments: &'a [ArgumentValue]) -> Self {
        Self {
            arguments,
            info: None,
            reporter: None,
        }
    }

    pub fn with_test_info(mut self, info: &'a TestInfo) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_reporter(mut self, reporter: &'a Reporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// All non-context arguments: value parameters first, then aggregated ones.
    pub fn arguments(&self) -> &'a [ArgumentValue] {
        self.arguments
    }

    /// Typed argument `index`.
    ///
    /// ## Errors
    /// `TestFailure::Error` when the index is out of range or the value has another type.
    pub fn get<T: FromArgument>(&self, index: usize) -> Result<T, TestFailure> {
        let value = self.arguments.get(index).ok_or_else(|| {
            TestFailure::error(format!(
                "argument {index} requested but the invocation has {}",
                self.arguments.len()
            ))
        })?;
        T::from_argument(value).ok_or_else(|| {
            TestFailure::error(format!(
                "argument {index} is a {} and cannot be read as {}",
                value.kind_name(),
                std::any::type_name::<T>()
            ))
        })
    }

    /// Raw argument `index`.
    pub fn value(&self, index: usize) -> Option<&'a ArgumentValue> {
        self.arguments.get(index)
    }

    /// Present when the definition declares a test-info parameter.
    pub fn test_info(&self) -> Option<&'a TestInfo> {
        self.info
    }

    /// Present when the definition declares a reporter parameter.
    pub fn reporter(&self) -> Option<&'a Reporter> {
        self.reporter
    }
}
