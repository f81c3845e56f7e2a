//! Test invocation engine
//!
//! Drives one definition through its rows:
//!
//! ```text
//! Configured → Sourcing → (Converting → Invoking → Recorded)* → Completed
//! ```
//!
//! ## Notes
//! - **Sourcing** failures are returned as `ConfigurationError`; no row runs.
//! - **Per-row** failures (conversion, aggregation, assertion, error, panic) are recorded on that row and never
//!   stop later rows.
//! - **Display names** are rendered before the test is called, from the typed arguments, or from the raw fields
//!   when conversion failed.
//!
//! ## Module Structure
//!
//! - `record` - `Outcome`, `InvocationRecord`, `RunReport`

mod record;

pub use record::{InvocationRecord, Outcome, RunReport};

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use paramrun_core::ArgumentValue;

use crate::aggregate::RowAccessor;
use crate::config::EngineConfig;
use crate::convert::RowConverter;
use crate::definition::{ParamKind, TestDefinition};
use crate::display::{self, NameContext};
use crate::errors::{AggregationError, ConfigurationError, ConversionError, TestFailure};
use crate::invocation::{Invocation, Reporter, TestInfo};
use crate::report::{RunReporter, SilentReporter};
use crate::source::{ArgumentRow, ArgumentSource, ProviderRegistry};

/// Lifecycle phase of a definition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Configured,
    Sourcing,
    Converting,
    Invoking,
    Recorded,
    Completed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Configured => "configured",
            RunPhase::Sourcing => "sourcing",
            RunPhase::Converting => "converting",
            RunPhase::Invoking => "invoking",
            RunPhase::Recorded => "recorded",
            RunPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Why a row never reached the test function.
enum RowFailure {
    Conversion(ConversionError),
    Aggregation(AggregationError),
}

/// Runs definitions against their argument sources.
#[derive(Debug, Clone, Default)]
pub struct InvocationEngine {
    config: EngineConfig,
    registry: ProviderRegistry,
}

impl InvocationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: ProviderRegistry::new(),
        }
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.registry
    }

    /// Run `definition` without a listener.
    pub fn run(&self, definition: &TestDefinition) -> Result<RunReport, ConfigurationError> {
        self.run_with(definition, &mut SilentReporter)
    }

    /// Run `definition`, notifying `listener` as the run progresses.
    ///
    /// ## Errors
    /// Only [`ConfigurationError`]; every per-row failure is recorded in the report instead.
    #[tracing::instrument(skip_all, fields(test = %definition.name))]
    pub fn run_with(
        &self,
        definition: &TestDefinition,
        listener: &mut dyn RunReporter,
    ) -> Result<RunReport, ConfigurationError> {
        let started = Instant::now();
        tracing::debug!(phase = %RunPhase::Configured, params = definition.params.len());
        listener.on_run_start(definition);

        tracing::debug!(phase = %RunPhase::Sourcing, source = definition.source.kind_name());
        let source = match definition
            .validate()
            .and_then(|()| ArgumentSource::open(&definition.source, &self.registry))
        {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!(error = %err, "definition could not be sourced");
                listener.on_configuration_error(definition, &err);
                return Err(err);
            }
        };

        let names = argument_names(definition, source.column_names());
        let template = definition
            .name_template
            .as_deref()
            .unwrap_or(&self.config.default_name_template);

        let mut records = Vec::new();
        for (offset, row) in source.enumerate() {
            let record = self.run_row(definition, row, offset + 1, template, &names);
            tracing::debug!(
                phase = %RunPhase::Recorded,
                index = record.index,
                status = record.outcome.status()
            );
            for entry in &record.entries {
                listener.on_entry(&record, entry);
            }
            listener.on_invocation_complete(&record);
            records.push(record);
        }

        let report = RunReport {
            test_name: definition.name.clone(),
            display_name: definition.resolved_display_name().to_string(),
            records,
            duration: started.elapsed(),
        };
        tracing::debug!(
            phase = %RunPhase::Completed,
            invocations = report.records.len(),
            passed = report.passed(),
            failed = report.failed(),
            "run complete"
        );
        listener.on_run_complete(&report);
        Ok(report)
    }

    fn run_row(
        &self,
        definition: &TestDefinition,
        row: ArgumentRow,
        index: usize,
        template: &str,
        names: &[String],
    ) -> InvocationRecord {
        let started = Instant::now();
        let converter = RowConverter::new(&self.config);

        tracing::debug!(phase = %RunPhase::Converting, index);
        let bound = bind_arguments(definition, &row, index, converter, self.config.catch_panics);

        let display_values: Vec<ArgumentValue> = match &bound {
            Ok(values) => values.clone(),
            Err(_) => row.fields().iter().map(|f| f.to_display_value()).collect(),
        };
        let display_name = display::format(
            template,
            &NameContext {
                index,
                display_name: definition.resolved_display_name(),
                label: row.label(),
                arguments: &display_values,
                names,
                max_argument_length: self.config.max_argument_length,
            },
        );

        let (arguments, outcome, entries) = match bound {
            Err(RowFailure::Conversion(err)) => (None, Outcome::ConversionError(err), Vec::new()),
            Err(RowFailure::Aggregation(err)) => (None, Outcome::AggregationError(err), Vec::new()),
            Ok(values) => {
                tracing::debug!(phase = %RunPhase::Invoking, index, name = %display_name);
                let info = TestInfo {
                    display_name: display_name.clone(),
                    index,
                    test_name: definition.name.clone(),
                };
                let reporter = Reporter::new();
                let outcome = self.invoke(definition, &values, &info, &reporter);
                (Some(values), outcome, reporter.into_entries())
            }
        };

        InvocationRecord {
            index,
            display_name,
            row,
            arguments,
            outcome,
            entries,
            duration: started.elapsed(),
        }
    }

    fn invoke(&self, definition: &TestDefinition, values: &[ArgumentValue], info: &TestInfo, reporter: &Reporter) -> Outcome {
        let mut invocation = Invocation::new(values);
        for param in &definition.params {
            match param.kind {
                ParamKind::TestInfo => invocation = invocation.with_test_info(info),
                ParamKind::Reporter => invocation = invocation.with_reporter(reporter),
                _ => {}
            }
        }

        let test_fn = definition.test_fn();
        let result = if self.config.catch_panics {
            match panic::catch_unwind(AssertUnwindSafe(|| test_fn(&invocation))) {
                Ok(result) => result,
                Err(payload) => Err(TestFailure::assertion(format!("panicked: {}", panic_message(&*payload)))),
            }
        } else {
            test_fn(&invocation)
        };

        match result {
            Ok(()) => Outcome::Passed,
            Err(TestFailure::Assertion(msg)) => Outcome::Failed(msg),
            Err(TestFailure::Error(msg)) => Outcome::Errored(msg),
        }
    }
}

/// Convert value parameters, then run aggregators in declaration order.
///
/// With `catch_panics`, a panicking aggregator fails only its own row.
fn bind_arguments(
    definition: &TestDefinition,
    row: &ArgumentRow,
    index: usize,
    converter: RowConverter<'_>,
    catch_panics: bool,
) -> Result<Vec<ArgumentValue>, RowFailure> {
    let mut values = converter
        .convert(row, &definition.params)
        .map_err(RowFailure::Conversion)?;

    let accessor = RowAccessor::new(row, index, converter);
    for param in &definition.params {
        if let ParamKind::Aggregate { aggregator, .. } = &param.kind {
            let result = if catch_panics {
                panic::catch_unwind(AssertUnwindSafe(|| aggregator.aggregate(&accessor))).unwrap_or_else(|payload| {
                    Err(AggregationError::Failed(format!("panicked: {}", panic_message(&*payload))))
                })
            } else {
                aggregator.aggregate(&accessor)
            };
            let value = result.map_err(RowFailure::Aggregation)?;
            values.push(value);
        }
    }
    Ok(values)
}

/// Names for `{argumentsWithNames}`. Header names win for the columns bound to value parameters.
fn argument_names(definition: &TestDefinition, headers: Option<&[String]>) -> Vec<String> {
    definition
        .data_params()
        .enumerate()
        .map(|(i, param)| match (&param.kind, headers.and_then(|h| h.get(i))) {
            (ParamKind::Value(_), Some(header)) => header.clone(),
            _ => param.name.clone(),
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
