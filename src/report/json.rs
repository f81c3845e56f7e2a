//! JSON-lines reporter: one object per event, for machine consumers.

use std::io::{self, Write};

use serde_json::{Value, json};

use super::RunReporter;
use crate::definition::TestDefinition;
use crate::engine::{InvocationRecord, RunReport};
use crate::errors::ConfigurationError;
use crate::invocation::ReportEntry;
use crate::suite::SuiteSummary;

/// Writes one JSON object per line to `out` (stdout by default).
pub struct JsonReporter<W: Write = io::Stdout> {
    out: W,
    /// Name of the definition currently running
    current: String,
}

impl JsonReporter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for JsonReporter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            current: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: Value) {
        let _ = writeln!(self.out, "{event}");
    }
}

fn invocation_event(test: &str, record: &InvocationRecord) -> Value {
    json!({
        "event": "invocation",
        "test": test,
        "index": record.index,
        "display_name": record.display_name,
        "status": record.outcome.status(),
        "message": record.outcome.message(),
        "arguments": record
            .arguments
            .as_ref()
            .map(|args| args.iter().map(|a| a.to_string()).collect::<Vec<_>>()),
        "duration_ms": record.duration.as_secs_f64() * 1000.0,
    })
}

impl<W: Write> RunReporter for JsonReporter<W> {
    fn on_run_start(&mut self, definition: &TestDefinition) {
        self.current = definition.name.clone();
        self.emit(json!({
            "event": "run_start",
            "test": definition.name,
            "display_name": definition.resolved_display_name(),
        }));
    }

    fn on_entry(&mut self, record: &InvocationRecord, entry: &ReportEntry) {
        let event = json!({
            "event": "entry",
            "test": self.current,
            "index": record.index,
            "key": entry.key,
            "value": entry.value,
        });
        self.emit(event);
    }

    fn on_invocation_complete(&mut self, record: &InvocationRecord) {
        let event = invocation_event(&self.current, record);
        self.emit(event);
    }

    fn on_run_complete(&mut self, report: &RunReport) {
        self.emit(json!({
            "event": "run_complete",
            "test": report.test_name,
            "invocations": report.records.len(),
            "passed": report.passed(),
            "failed": report.failed(),
        }));
    }

    fn on_configuration_error(&mut self, definition: &TestDefinition, error: &ConfigurationError) {
        self.emit(json!({
            "event": "configuration_error",
            "test": definition.name,
            "message": error.to_string(),
        }));
    }

    fn on_suite_complete(&mut self, summary: &SuiteSummary) {
        self.emit(json!({
            "event": "suite_complete",
            "definitions": summary.definitions,
            "deselected": summary.deselected,
            "invocations": summary.invocations,
            "passed": summary.passed,
            "failed": summary.failed,
            "configuration_errors": summary.configuration_errors,
            "success": summary.is_success(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Param;
    use crate::engine::InvocationEngine;
    use crate::errors::TestResult;
    use crate::invocation::Invocation;
    use crate::source::SourceDescriptor;
    use crate::suite::{Suite, SuiteOptions};
    use paramrun_core::ArgType;

    fn publish(inv: &Invocation<'_>) -> TestResult {
        let n: i64 = inv.get(0)?;
        if let Some(reporter) = inv.reporter() {
            reporter.publish(n.to_string());
        }
        Ok(())
    }

    fn events() -> Vec<Value> {
        let suite = Suite::new("json")
            .with(TestDefinition::new(
                "numbers",
                vec![Param::value("n", ArgType::Int), Param::reporter("r")],
                SourceDescriptor::literal(["7", "x"]),
                publish,
            ))
            .with(TestDefinition::new(
                "unsourced",
                Vec::new(),
                SourceDescriptor::method("missing"),
                publish,
            ));
        let mut reporter = JsonReporter::with_writer(Vec::new());
        suite.run(&InvocationEngine::default(), &SuiteOptions::new(), &mut reporter);
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        out.lines().map(|line| serde_json::from_str(line).unwrap()).collect()
    }

    #[test]
    fn test_event_sequence() {
        let kinds: Vec<String> = events().iter().map(|e| e["event"].as_str().unwrap().to_string()).collect();
        assert_eq!(
            kinds,
            vec![
                "run_start",
                "entry",
                "invocation",
                "invocation",
                "run_complete",
                "run_start",
                "configuration_error",
                "suite_complete"
            ]
        );
    }

    #[test]
    fn test_invocation_fields() {
        let events = events();
        assert_eq!(events[1]["value"], "7");
        assert_eq!(events[2]["status"], "PASSED");
        assert_eq!(events[2]["arguments"], json!(["7"]));
        assert_eq!(events[3]["status"], "CONVERSION ERROR");
        assert_eq!(events[3]["arguments"], Value::Null);
        assert_eq!(events[7]["success"], false);
    }
}
