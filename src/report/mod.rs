//! Run reporting (pytest-style console, JSON lines)
//!
//! ## RunReporter Trait
//!
//! The engine and the suite runner notify a [`RunReporter`] as runs progress. Reporting is kept out of execution
//! so output formats can be swapped by implementing the trait.
//!
//! ## Module Structure
//!
//! - `console` - Human-readable output with ANSI colors
//! - `json` - One JSON object per event

mod console;
mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

use crate::definition::TestDefinition;
use crate::engine::{InvocationRecord, RunReport};
use crate::errors::ConfigurationError;
use crate::invocation::ReportEntry;
use crate::suite::SuiteSummary;

// ============================================================================
// Run Reporter Trait
// ============================================================================

/// Listener for run progress.
pub trait RunReporter {
    /// Called before a suite runs its definitions
    fn on_suite_start(&mut self, _definition_count: usize) {}

    /// Called when a definition starts, before its source is opened
    fn on_run_start(&mut self, _definition: &TestDefinition) {}

    /// Called for every entry a test published, before its invocation completes
    fn on_entry(&mut self, _record: &InvocationRecord, _entry: &ReportEntry) {}

    /// Called when an invocation has been recorded
    fn on_invocation_complete(&mut self, record: &InvocationRecord);

    /// Called when every row of a definition has been recorded
    fn on_run_complete(&mut self, report: &RunReport);

    /// Called when a definition could not be sourced
    fn on_configuration_error(&mut self, _definition: &TestDefinition, _error: &ConfigurationError) {}

    /// Called after the last definition of a suite
    fn on_suite_complete(&mut self, _summary: &SuiteSummary) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl RunReporter for SilentReporter {
    fn on_invocation_complete(&mut self, _record: &InvocationRecord) {}

    fn on_run_complete(&mut self, _report: &RunReport) {}
}
