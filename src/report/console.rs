//! Default console reporter (pytest-style)

use std::io::{self, Write};

use super::RunReporter;
use crate::definition::TestDefinition;
use crate::engine::{InvocationRecord, Outcome, RunReport};
use crate::errors::ConfigurationError;
use crate::invocation::ReportEntry;
use crate::suite::SuiteSummary;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const BOLD_RED: &str = "\x1b[1;31m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

/// One failed invocation or unsourced definition, printed in the FAILURES section.
struct FailureNote {
    heading: String,
    message: String,
}

/// Writes progress and a pytest-like summary to `out` (stdout by default).
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    verbose: bool,
    color: bool,
    /// Entries of the running invocation, printed under its status line
    entries: Vec<String>,
    failures: Vec<FailureNote>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn new(verbose: bool) -> Self {
        Self::with_writer(io::stdout(), verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            color: true,
            entries: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Enable or disable ANSI colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    // Write errors are ignored.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
    }

    fn emit_line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn status(&self, outcome: &Outcome) -> String {
        let color = match outcome {
            Outcome::Passed => GREEN,
            Outcome::Failed(_) => RED,
            _ => YELLOW,
        };
        if self.verbose {
            self.paint(color, outcome.status())
        } else {
            let mark = match outcome {
                Outcome::Passed => ".",
                Outcome::Failed(_) => "F",
                _ => "E",
            };
            self.paint(color, mark)
        }
    }
}

impl<W: Write> RunReporter for ConsoleReporter<W> {
    fn on_suite_start(&mut self, definition_count: usize) {
        let banner = self.paint(BOLD, "=================== test session starts ===================");
        self.emit_line(&banner);
        self.emit_line(&format!("collected {definition_count} definition(s)"));
        self.emit_line("");
    }

    fn on_run_start(&mut self, definition: &TestDefinition) {
        if self.verbose {
            self.emit_line(definition.resolved_display_name());
        } else {
            self.emit(&format!("{} ", definition.name));
        }
    }

    fn on_entry(&mut self, _record: &InvocationRecord, entry: &ReportEntry) {
        if self.verbose {
            self.entries.push(format!("    {} = {}", entry.key, entry.value));
        }
    }

    fn on_invocation_complete(&mut self, record: &InvocationRecord) {
        let status = self.status(&record.outcome);
        if self.verbose {
            self.emit_line(&format!(
                "  {} {} ({}ms)",
                record.display_name,
                status,
                record.duration.as_millis()
            ));
            for line in std::mem::take(&mut self.entries) {
                self.emit_line(&line);
            }
        } else {
            self.emit(&status);
        }

        if let Some(message) = record.outcome.message() {
            self.failures.push(FailureNote {
                heading: record.display_name.clone(),
                message: format!("{}: {message}", record.outcome.status()),
            });
        }
    }

    fn on_run_complete(&mut self, _report: &RunReport) {
        if !self.verbose {
            self.emit_line("");
        }
    }

    fn on_configuration_error(&mut self, definition: &TestDefinition, error: &ConfigurationError) {
        let status = self.paint(YELLOW, "ERROR");
        if self.verbose {
            self.emit_line(&format!("  {status}"));
        } else {
            self.emit_line(&status);
        }
        self.failures.push(FailureNote {
            heading: definition.name.clone(),
            message: format!("configuration error: {error}"),
        });
    }

    fn on_suite_complete(&mut self, summary: &SuiteSummary) {
        if !self.failures.is_empty() {
            self.emit_line("");
            let banner = self.paint(BOLD_RED, "=================== FAILURES ===================");
            self.emit_line(&banner);
            for note in std::mem::take(&mut self.failures) {
                self.emit_line("");
                let heading = self.paint(BOLD, &format!("___________ {} ___________", note.heading));
                self.emit_line(&heading);
                self.emit_line(&format!("    {}", note.message));
            }
        }

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.configuration_errors > 0 {
            parts.push(format!("{} error(s)", summary.configuration_errors));
        }
        if summary.deselected > 0 {
            parts.push(format!("{} deselected", summary.deselected));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }

        let color = if summary.is_success() { BOLD_GREEN } else { BOLD_RED };
        let line = format!(
            "=================== {} in {:.2}s ===================",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
        self.emit_line("");
        let line = self.paint(color, &line);
        self.emit_line(&line);
    }
}
