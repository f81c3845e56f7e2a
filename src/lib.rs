#![forbid(unsafe_code)]
//! paramrun: a parameterized-test execution engine
//!
//! One test function, many argument sets. A [`TestDefinition`] names the function, its declared parameters and a
//! [`SourceDescriptor`]; the [`InvocationEngine`] opens the source, converts every row to typed arguments, runs
//! aggregators, renders a display name and invokes the function once per row, recording one outcome per row.
//!
//! ## Pipeline
//!
//! ```text
//! SourceDescriptor → ArgumentSource → ArgumentRow → RowConverter / Aggregator → Invocation → InvocationRecord
//!                                                        ↘ display::format ↗
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Test bodies**: panics inside a test function are caught by the engine and recorded as failures, unless
//!   `EngineConfig::catch_panics` is turned off.

pub mod aggregate;
pub mod assertions;
pub mod cli;
pub mod config;
pub mod convert;
pub mod definition;
pub mod demo;
pub mod display;
pub mod engine;
pub mod errors;
pub mod invocation;
pub mod report;
pub mod source;
pub mod suite;

pub use paramrun_core::{ArgType, ArgumentValue, EnumType, ParamEnum};

pub use aggregate::{Aggregator, RowAccessor};
pub use config::{DelimitedOptions, EngineConfig};
pub use definition::{Param, ParamKind, Preset, TestDefinition};
pub use engine::{InvocationEngine, InvocationRecord, Outcome, RunReport};
pub use errors::{AggregationError, ConfigurationError, ConversionError, TestFailure, TestResult};
pub use invocation::{FromArgument, Invocation, ReportEntry, Reporter, TestInfo};
pub use report::{ConsoleReporter, JsonReporter, RunReporter};
pub use source::{ArgumentRow, ArgumentSource, EnumFilter, Field, ProviderRegistry, SourceDescriptor};
pub use suite::{Suite, SuiteOptions, SuiteSummary};
