//! CLI module for paramrun
//!
//! ## Commands
//!
//! - `demo` - Run the built-in demonstration suite
//! - `preview <file>` - Parse a delimited fixture and print the display name of every row
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic with miette's graphical report (source snippet, labels, help).
    pub fn diagnostic<E>(error: E) -> Self
    where
        E: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(error)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Parameterized-test execution engine
#[derive(Parser, Debug)]
#[command(name = "paramrun")]
#[command(version = VERSION)]
#[command(about = "Run parameterized tests over literal, delimited, enum and provider sources", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Report format for `demo`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the built-in demonstration suite (pytest-style)
    Demo {
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Only run definitions whose name contains this keyword
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,
        /// Disable ANSI colors in console output
        #[arg(long)]
        no_color: bool,
        /// Truncate rendered arguments to this many characters (0 disables truncation)
        #[arg(long, value_name = "N")]
        max_argument_length: Option<usize>,
    },

    /// Parse a delimited fixture file and print each row's display name
    Preview {
        /// Fixture file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Single-character field delimiter
        #[arg(long, conflicts_with = "delimiter_string")]
        delimiter: Option<char>,
        /// Multi-character field delimiter
        #[arg(long, value_name = "STRING")]
        delimiter_string: Option<String>,
        /// Quote character (default `"`)
        #[arg(long)]
        quote: Option<char>,
        /// Lines to skip at the top of the file
        #[arg(long, value_name = "N", default_value_t = 0)]
        skip_lines: usize,
        /// Treat the first record as column names
        #[arg(long)]
        headers: bool,
        /// Bare field text to read as null (repeatable)
        #[arg(long = "null-value", value_name = "TEXT")]
        null_values: Vec<String>,
        /// Display-name template
        #[arg(long, value_name = "TEMPLATE")]
        name: Option<String>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Demo {
            verbose,
            stop_on_fail,
            filter,
            format,
            no_color,
            max_argument_length,
        } => commands::run_demo(&commands::DemoArgs {
            verbose,
            stop_on_fail,
            filter,
            format,
            color: !no_color,
            max_argument_length,
        }),
        Command::Preview {
            file,
            delimiter,
            delimiter_string,
            quote,
            skip_lines,
            headers,
            null_values,
            name,
        } => commands::preview_file(&commands::PreviewArgs {
            file,
            delimiter,
            delimiter_string,
            quote,
            skip_lines,
            headers,
            null_values,
            name,
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
