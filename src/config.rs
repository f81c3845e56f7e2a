//! Engine and source configuration
//!
//! Both structs follow the same pattern: `Default` gives the documented defaults and chained `with_*` methods
//! override single settings.

use paramrun_core::parse::{DEFAULT_DATE_PATTERN, DEFAULT_DATE_TIME_PATTERN, TemporalPatterns};
use paramrun_syntax::{DelimitedFormat, Delimiter};

use crate::errors::ConfigurationError;

/// Display-name template used when a definition does not set its own.
pub const DEFAULT_NAME_TEMPLATE: &str = "[{index}] {argumentsWithNames}";

/// Longest argument text (in characters) rendered into a display name.
pub const DEFAULT_MAX_ARGUMENT_LENGTH: usize = 512;

/// Engine-wide settings
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// chrono pattern for `ArgType::DateTime`
    pub date_time_pattern: String,
    /// chrono pattern for `ArgType::Date`
    pub date_pattern: String,
    /// Template for definitions without their own
    pub default_name_template: String,
    /// Truncate each rendered argument to this many characters (0 disables truncation)
    pub max_argument_length: usize,
    /// Record panics in test bodies as assertion failures instead of unwinding out of the run
    pub catch_panics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            date_time_pattern: DEFAULT_DATE_TIME_PATTERN.to_string(),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            default_name_template: DEFAULT_NAME_TEMPLATE.to_string(),
            max_argument_length: DEFAULT_MAX_ARGUMENT_LENGTH,
            catch_panics: true,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date/time pattern
    pub fn with_date_time_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_time_pattern = pattern.into();
        self
    }

    /// Set the date pattern
    pub fn with_date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self
    }

    /// Set the default display-name template
    pub fn with_default_name_template(mut self, template: impl Into<String>) -> Self {
        self.default_name_template = template.into();
        self
    }

    /// Set the maximum rendered argument length
    pub fn with_max_argument_length(mut self, length: usize) -> Self {
        self.max_argument_length = length;
        self
    }

    /// Enable or disable panic capture
    pub fn with_catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = catch;
        self
    }

    /// Patterns handed to the scalar parser.
    pub fn temporal_patterns(&self) -> TemporalPatterns<'_> {
        TemporalPatterns {
            date_time: &self.date_time_pattern,
            date: &self.date_pattern,
        }
    }
}

/// Options for inline and file-backed delimited sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedOptions {
    /// Single-character delimiter (`,` when neither delimiter option is set)
    pub delimiter: Option<char>,
    /// Multi-character delimiter; mutually exclusive with `delimiter`
    pub delimiter_string: Option<String>,
    /// Quote character (`'` for inline text, `"` for files when unset)
    pub quote: Option<char>,
    pub trim_whitespace: bool,
    /// Value for blank unquoted fields, which are otherwise null
    pub empty_value: Option<String>,
    /// Bare field texts read as null
    pub null_values: Vec<String>,
    /// Lines dropped from the top before lexing (file sources)
    pub skip_lines: usize,
    /// Treat the first record as column names instead of data
    pub use_headers: bool,
    pub comment: Option<char>,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            delimiter_string: None,
            quote: None,
            trim_whitespace: true,
            empty_value: None,
            null_values: Vec::new(),
            skip_lines: 0,
            use_headers: false,
            comment: Some('#'),
        }
    }
}

impl DelimitedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_delimiter_string(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter_string = Some(delimiter.into());
        self
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn with_trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    pub fn with_empty_value(mut self, value: impl Into<String>) -> Self {
        self.empty_value = Some(value.into());
        self
    }

    pub fn with_null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skip_lines(mut self, lines: usize) -> Self {
        self.skip_lines = lines;
        self
    }

    pub fn with_headers(mut self, use_headers: bool) -> Self {
        self.use_headers = use_headers;
        self
    }

    /// Resolve into a lexer format, falling back to `default_quote` when no quote is configured.
    ///
    /// ## Errors
    /// - `ConflictingDelimiters` when both delimiter options are set.
    /// - `Format` when the resulting format is ambiguous (empty delimiter, delimiter containing the quote, ...).
    pub fn to_format(&self, default_quote: char) -> Result<DelimitedFormat, ConfigurationError> {
        let delimiter = match (&self.delimiter, &self.delimiter_string) {
            (Some(_), Some(_)) => return Err(ConfigurationError::ConflictingDelimiters),
            (Some(c), None) => Delimiter::Char(*c),
            (None, Some(s)) => Delimiter::Str(s.clone()),
            (None, None) => Delimiter::default(),
        };
        let format = DelimitedFormat::new()
            .with_delimiter(delimiter)
            .with_quote(self.quote.unwrap_or(default_quote))
            .with_trim_whitespace(self.trim_whitespace)
            .with_comment(self.comment);
        format.validate()?;
        Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Default config tests
    // ========================================

    #[test]
    fn test_default_engine_config() {
        let config = EngineConfig::default();
        assert_eq!(config.date_time_pattern, "%Y-%m-%dT%H:%M:%S");
        assert_eq!(config.date_pattern, "%Y-%m-%d");
        assert_eq!(config.default_name_template, "[{index}] {argumentsWithNames}");
        assert_eq!(config.max_argument_length, 512);
        assert!(config.catch_panics);
    }

    #[test]
    fn test_engine_config_builder_chain() {
        let config = EngineConfig::new()
            .with_date_time_pattern("%d/%m/%Y %H:%M")
            .with_max_argument_length(8)
            .with_catch_panics(false);
        assert_eq!(config.temporal_patterns().date_time, "%d/%m/%Y %H:%M");
        assert_eq!(config.max_argument_length, 8);
        assert!(!config.catch_panics);
    }

    // ========================================
    // Delimited options
    // ========================================

    #[test]
    fn test_default_quote_depends_on_caller() {
        let options = DelimitedOptions::default();
        assert_eq!(options.to_format('\'').unwrap().quote, '\'');
        assert_eq!(options.to_format('"').unwrap().quote, '"');
        assert_eq!(options.clone().with_quote('|').to_format('"').unwrap().quote, '|');
    }

    #[test]
    fn test_conflicting_delimiters_are_rejected() {
        let options = DelimitedOptions::new().with_delimiter(';').with_delimiter_string("::");
        assert!(matches!(
            options.to_format('\''),
            Err(ConfigurationError::ConflictingDelimiters)
        ));
    }

    #[test]
    fn test_invalid_format_is_a_configuration_error() {
        let options = DelimitedOptions::new().with_delimiter_string("");
        assert!(matches!(options.to_format('\''), Err(ConfigurationError::Format(_))));
    }
}
