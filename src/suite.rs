//! Suite runner
//!
//! Runs a list of definitions in order, with a keyword filter and stop-on-first-failure, and summarizes the
//! result. A definition that cannot be sourced counts as an error and does not stop the suite unless
//! `stop_on_fail` is set.

use std::time::{Duration, Instant};

use crate::definition::TestDefinition;
use crate::engine::{InvocationEngine, RunReport};
use crate::report::RunReporter;

/// Options for [`Suite::run`].
#[derive(Debug, Clone, Default)]
pub struct SuiteOptions {
    /// Only run definitions whose name or display name contains this keyword
    pub keyword: Option<String>,
    /// Stop after the first definition with a failed invocation or configuration error
    pub stop_on_fail: bool,
}

impl SuiteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_stop_on_fail(mut self, stop: bool) -> Self {
        self.stop_on_fail = stop;
        self
    }

    fn selects(&self, definition: &TestDefinition) -> bool {
        match &self.keyword {
            Some(keyword) => {
                definition.name.contains(keyword.as_str()) || definition.resolved_display_name().contains(keyword.as_str())
            }
            None => true,
        }
    }
}

/// Summary of a suite run
#[derive(Debug, Clone, Default)]
pub struct SuiteSummary {
    /// Definitions that ran (or were attempted)
    pub definitions: usize,
    /// Definitions filtered out by keyword
    pub deselected: usize,
    pub invocations: usize,
    pub passed: usize,
    pub failed: usize,
    /// Definitions that could not be sourced
    pub configuration_errors: usize,
    /// Set when `stop_on_fail` cut the run short
    pub stopped_early: bool,
    pub duration: Duration,
    pub reports: Vec<RunReport>,
}

impl SuiteSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.configuration_errors == 0
    }
}

/// Ordered collection of definitions.
#[derive(Debug, Clone, Default)]
pub struct Suite {
    pub name: String,
    definitions: Vec<TestDefinition>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definitions: Vec::new(),
        }
    }

    pub fn add(&mut self, definition: TestDefinition) -> &mut Self {
        self.definitions.push(definition);
        self
    }

    pub fn with(mut self, definition: TestDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn definitions(&self) -> &[TestDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Run every selected definition in order.
    #[tracing::instrument(skip_all, fields(suite = %self.name))]
    pub fn run(&self, engine: &InvocationEngine, options: &SuiteOptions, reporter: &mut dyn RunReporter) -> SuiteSummary {
        let started = Instant::now();
        let selected: Vec<&TestDefinition> = self.definitions.iter().filter(|d| options.selects(d)).collect();

        let mut summary = SuiteSummary {
            deselected: self.definitions.len() - selected.len(),
            ..SuiteSummary::default()
        };
        reporter.on_suite_start(selected.len());

        for definition in selected {
            summary.definitions += 1;
            let failed = match engine.run_with(definition, reporter) {
                Ok(report) => {
                    summary.invocations += report.records.len();
                    summary.passed += report.passed();
                    summary.failed += report.failed();
                    let failed = !report.is_success();
                    summary.reports.push(report);
                    failed
                }
                Err(_) => {
                    summary.configuration_errors += 1;
                    true
                }
            };
            if failed && options.stop_on_fail {
                tracing::info!(test = %definition.name, "stopping after first failure");
                summary.stopped_early = true;
                break;
            }
        }

        summary.duration = started.elapsed();
        reporter.on_suite_complete(&summary);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Param;
    use crate::errors::{TestFailure, TestResult};
    use crate::invocation::Invocation;
    use crate::report::SilentReporter;
    use crate::source::SourceDescriptor;
    use paramrun_core::ArgType;

    fn positive(inv: &Invocation<'_>) -> TestResult {
        let n: i64 = inv.get(0)?;
        if n > 0 {
            Ok(())
        } else {
            Err(TestFailure::assertion(format!("{n} is not positive")))
        }
    }

    fn numbers(name: &str, values: &[i64]) -> TestDefinition {
        TestDefinition::new(
            name,
            vec![Param::value("n", ArgType::Int)],
            SourceDescriptor::literal(values.iter().copied()),
            positive,
        )
    }

    fn suite() -> Suite {
        Suite::new("numbers")
            .with(numbers("small_numbers", &[1, 2, 3]))
            .with(numbers("mixed_numbers", &[4, -5]))
            .with(numbers("big_numbers", &[100]))
    }

    #[test]
    fn test_runs_all_definitions_in_order() {
        let summary = suite().run(&InvocationEngine::default(), &SuiteOptions::new(), &mut SilentReporter);
        assert_eq!(summary.definitions, 3);
        assert_eq!(summary.invocations, 6);
        assert_eq!(summary.passed, 5);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_success());
        let names: Vec<&str> = summary.reports.iter().map(|r| r.test_name.as_str()).collect();
        assert_eq!(names, vec!["small_numbers", "mixed_numbers", "big_numbers"]);
    }

    #[test]
    fn test_keyword_filter() {
        let options = SuiteOptions::new().with_keyword("big");
        let summary = suite().run(&InvocationEngine::default(), &options, &mut SilentReporter);
        assert_eq!(summary.definitions, 1);
        assert_eq!(summary.deselected, 2);
        assert!(summary.is_success());
    }

    #[test]
    fn test_stop_on_fail() {
        let options = SuiteOptions::new().with_stop_on_fail(true);
        let summary = suite().run(&InvocationEngine::default(), &options, &mut SilentReporter);
        assert!(summary.stopped_early);
        assert_eq!(summary.definitions, 2);
        // rows inside the failing definition still all ran
        assert_eq!(summary.reports[1].records.len(), 2);
    }

    #[test]
    fn test_configuration_error_counts_but_does_not_stop() {
        let mut suite = suite();
        suite.add(TestDefinition::new(
            "unsourced",
            vec![Param::value("n", ArgType::Int)],
            SourceDescriptor::method("nobody"),
            positive,
        ));
        suite.add(numbers("after", &[1]));
        let summary = suite.run(&InvocationEngine::default(), &SuiteOptions::new(), &mut SilentReporter);
        assert_eq!(summary.configuration_errors, 1);
        assert_eq!(summary.definitions, 5);
        assert_eq!(summary.reports.len(), 4);
    }
}
