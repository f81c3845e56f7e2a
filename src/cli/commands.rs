//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::PathBuf;

use crate::config::{DEFAULT_NAME_TEMPLATE, DelimitedOptions, EngineConfig};
use crate::demo::{demo_engine, demo_suite};
use crate::display::{self, NameContext};
use crate::report::{ConsoleReporter, JsonReporter, RunReporter};
use crate::source::{ArgumentSource, ProviderRegistry, SourceDescriptor};
use crate::suite::SuiteOptions;

use super::{CliError, CliResult, ExitCode, OutputFormat};

// ============================================================================
// demo
// ============================================================================

/// Arguments of the `demo` command.
#[derive(Debug, Clone)]
pub struct DemoArgs {
    pub verbose: bool,
    pub stop_on_fail: bool,
    pub filter: Option<String>,
    pub format: OutputFormat,
    pub color: bool,
    pub max_argument_length: Option<usize>,
}

/// Run the demonstration suite and report it in the requested format.
pub fn run_demo(args: &DemoArgs) -> CliResult<ExitCode> {
    let mut config = EngineConfig::new();
    if let Some(length) = args.max_argument_length {
        config = config.with_max_argument_length(length);
    }
    let engine = demo_engine(config);

    let mut options = SuiteOptions::new().with_stop_on_fail(args.stop_on_fail);
    if let Some(keyword) = &args.filter {
        options = options.with_keyword(keyword.as_str());
    }

    let mut reporter: Box<dyn RunReporter> = match args.format {
        OutputFormat::Console => Box::new(ConsoleReporter::new(args.verbose).with_color(args.color)),
        OutputFormat::Json => Box::new(JsonReporter::new()),
    };

    let summary = demo_suite().run(&engine, &options, reporter.as_mut());
    if summary.definitions == 0 {
        eprintln!("No definitions collected");
        // "no tests collected" is not a failure
        return Ok(ExitCode::SUCCESS);
    }

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Summary already printed
        Err(CliError::new("", ExitCode::FAILURE))
    }
}

// ============================================================================
// preview
// ============================================================================

/// Arguments of the `preview` command.
#[derive(Debug, Clone)]
pub struct PreviewArgs {
    pub file: PathBuf,
    pub delimiter: Option<char>,
    pub delimiter_string: Option<String>,
    pub quote: Option<char>,
    pub skip_lines: usize,
    pub headers: bool,
    pub null_values: Vec<String>,
    pub name: Option<String>,
}

impl PreviewArgs {
    fn options(&self) -> DelimitedOptions {
        let mut options = DelimitedOptions::new()
            .with_skip_lines(self.skip_lines)
            .with_headers(self.headers)
            .with_null_values(self.null_values.iter().cloned());
        if let Some(delimiter) = self.delimiter {
            options = options.with_delimiter(delimiter);
        }
        if let Some(delimiter) = &self.delimiter_string {
            options = options.with_delimiter_string(delimiter.as_str());
        }
        if let Some(quote) = self.quote {
            options = options.with_quote(quote);
        }
        options
    }
}

/// Display names for every row of a delimited file.
///
/// Fields are shown as text since no parameter types are declared.
pub fn preview_lines(args: &PreviewArgs) -> CliResult<Vec<String>> {
    let descriptor = SourceDescriptor::file(&args.file).with_options(args.options());
    let source = ArgumentSource::open(&descriptor, &ProviderRegistry::new()).map_err(CliError::diagnostic)?;

    let config = EngineConfig::default();
    let template = args.name.as_deref().unwrap_or(DEFAULT_NAME_TEMPLATE);
    let names: Vec<String> = source.column_names().map(<[String]>::to_vec).unwrap_or_default();
    let display_name = args.file.display().to_string();

    let lines = source
        .enumerate()
        .map(|(offset, row)| {
            let arguments: Vec<_> = row.fields().iter().map(|f| f.to_display_value()).collect();
            display::format(
                template,
                &NameContext {
                    index: offset + 1,
                    display_name: &display_name,
                    label: row.label(),
                    arguments: &arguments,
                    names: &names,
                    max_argument_length: config.max_argument_length,
                },
            )
        })
        .collect();
    Ok(lines)
}

/// Print the display name of every row of a delimited file.
pub fn preview_file(args: &PreviewArgs) -> CliResult<ExitCode> {
    let lines = preview_lines(args)?;
    for line in &lines {
        println!("{line}");
    }
    eprintln!("{} row(s)", lines.len());
    Ok(ExitCode::SUCCESS)
}
