//! Error taxonomy for parameterized runs
//!
//! - `ConfigurationError`: the definition cannot produce rows at all. Fatal; no invocation runs.
//! - `ConversionError`: one row does not fit the declared parameters. Recorded on that row only.
//! - `AggregationError`: an aggregator rejected one row. Recorded on that row, distinct from conversion.
//! - `TestFailure`: raised by the test body itself, either a failed assertion or an unexpected error.
//!
//! Only `ConfigurationError` ever escapes the engine.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource};
use paramrun_core::errors::NULL_TO_PRIMITIVE_MSG;
use paramrun_syntax::{FormatError, SyntaxError};
use thiserror::Error;

/// The definition cannot be sourced. No invocation runs.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigurationError {
    #[error("argument source produced no rows")]
    #[diagnostic(
        code(paramrun::config::no_rows),
        help("configure at least one set of arguments")
    )]
    NoRows,

    #[error("no argument provider registered under '{0}'")]
    #[diagnostic(code(paramrun::config::unknown_provider))]
    UnknownProvider(String),

    #[error("cannot read fixture '{}'", .path.display())]
    #[diagnostic(code(paramrun::config::unreadable_file))]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited text in {origin}")]
    #[diagnostic(code(paramrun::config::malformed))]
    Malformed {
        origin: String,
        #[source_code]
        src: NamedSource<String>,
        #[related]
        errors: Vec<SyntaxError>,
    },

    #[error("`delimiter` and `delimiter_string` cannot both be set")]
    #[diagnostic(code(paramrun::config::conflicting_delimiters))]
    ConflictingDelimiters,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatError),

    #[error("enum {enum_name} has no member(s) named {missing:?}")]
    #[diagnostic(code(paramrun::config::unknown_enum_members))]
    UnknownEnumMembers { enum_name: String, missing: Vec<String> },

    #[error("invalid parameter list: {0}")]
    #[diagnostic(code(paramrun::config::invalid_parameters))]
    InvalidParameters(String),
}

/// One row does not fit the declared parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("expected {expected} column(s) but the row has {actual}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("expected at least {required} column(s) but the row has {actual}")]
    TooFewColumns { required: usize, actual: usize },

    #[error("argument {index}: {message}")]
    Invalid { index: usize, message: String },

    #[error("argument {index}: {} ({ty})", NULL_TO_PRIMITIVE_MSG)]
    NullToPrimitive { index: usize, ty: String },

    #[error("argument {index}: expected {expected} but the provider supplied {actual}")]
    TypeMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("column {index} does not exist (the row has {len})")]
    MissingColumn { index: usize, len: usize },
}

/// An aggregator could not build its value from a row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("aggregation failed: {0}")]
    Failed(String),

    /// A typed accessor read failed inside the aggregator.
    #[error("aggregation failed: {0}")]
    Access(#[from] ConversionError),
}

impl AggregationError {
    pub fn new(message: impl Into<String>) -> Self {
        AggregationError::Failed(message.into())
    }
}

/// Raised by a test body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestFailure {
    /// The test's own check did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// Something other than an assertion went wrong inside the test.
    #[error("{0}")]
    Error(String),
}

impl TestFailure {
    pub fn assertion(message: impl Into<String>) -> Self {
        TestFailure::Assertion(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        TestFailure::Error(message.into())
    }
}

/// Result type returned by test bodies.
pub type TestResult = Result<(), TestFailure>;
