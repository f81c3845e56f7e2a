//! Diagnostics for delimited text.
//!
//! Syntax errors carry a byte span so callers can render them against the source with `miette`:
//!
//! ```rust
//! use miette::{NamedSource, Report};
//! use paramrun_syntax::lexer::{self, DelimitedFormat};
//!
//! let source = "a, 'b\n";
//! let errors = lexer::lex(source, &DelimitedFormat::default()).unwrap_err();
//! let report = Report::new(errors[0].clone()).with_source_code(NamedSource::new("inline", source.to_string()));
//! assert!(format!("{report:?}").contains("unterminated"));
//! ```

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Malformed delimited text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("line {line}: unterminated quoted field")]
    #[diagnostic(
        code(paramrun::syntax::unterminated_quote),
        help("close the field with the same quote character, or double it to write a literal quote")
    )]
    UnterminatedQuote {
        line: usize,
        #[label("quote opened here")]
        span: SourceSpan,
    },

    #[error("line {line}: unexpected text after closing quote")]
    #[diagnostic(
        code(paramrun::syntax::text_after_quote),
        help("a quoted field must be followed by a delimiter or the end of the line")
    )]
    TextAfterQuote {
        line: usize,
        #[label("expected a delimiter here")]
        span: SourceSpan,
    },
}

impl SyntaxError {
    /// 1-based line the error was found on.
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::UnterminatedQuote { line, .. } | SyntaxError::TextAfterQuote { line, .. } => *line,
        }
    }
}

/// A delimited-text format that cannot be lexed unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum FormatError {
    #[error("delimiter string must not be empty")]
    #[diagnostic(code(paramrun::format::empty_delimiter))]
    EmptyDelimiter,

    #[error("delimiter {delimiter:?} must not contain the quote character {quote:?}")]
    #[diagnostic(code(paramrun::format::delimiter_contains_quote))]
    DelimiterContainsQuote { delimiter: String, quote: char },

    #[error("quote character {0:?} must not be whitespace")]
    #[diagnostic(code(paramrun::format::whitespace_quote))]
    WhitespaceQuote(char),
}
