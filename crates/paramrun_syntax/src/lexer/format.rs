//! Lexer configuration.

use crate::diagnostics::FormatError;

/// Field separator: a single character or an arbitrary literal string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delimiter {
    Char(char),
    Str(String),
}

impl Delimiter {
    /// Byte length of the delimiter if `text` starts with it.
    pub fn match_at(&self, text: &str) -> Option<usize> {
        match self {
            Delimiter::Char(c) => text.starts_with(*c).then(|| c.len_utf8()),
            // An empty delimiter never matches; `DelimitedFormat::validate` rejects it up front.
            Delimiter::Str(s) => (!s.is_empty() && text.starts_with(s.as_str())).then_some(s.len()),
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Delimiter::Char(c) => c.to_string(),
            Delimiter::Str(s) => s.clone(),
        }
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Char(',')
    }
}

/// How a block of delimited text is split into records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedFormat {
    pub delimiter: Delimiter,
    /// Character enclosing fields that keep their content verbatim.
    pub quote: char,
    /// Trim spaces and tabs around bare fields and around quoted ones.
    pub trim_whitespace: bool,
    /// Lines whose first non-blank character is this are skipped.
    pub comment: Option<char>,
}

impl Default for DelimitedFormat {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            quote: '\'',
            trim_whitespace: true,
            comment: Some('#'),
        }
    }
}

impl DelimitedFormat {
    /// Create a format with default settings (`,` delimiter, `'` quote, trimming on, `#` comments).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Enable or disable whitespace trimming
    pub fn with_trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    /// Set or clear the comment marker
    pub fn with_comment(mut self, comment: Option<char>) -> Self {
        self.comment = comment;
        self
    }

    /// Reject formats that cannot be lexed unambiguously.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.quote.is_whitespace() {
            return Err(FormatError::WhitespaceQuote(self.quote));
        }
        let delimiter = self.delimiter.as_string();
        if delimiter.is_empty() {
            return Err(FormatError::EmptyDelimiter);
        }
        if delimiter.contains(self.quote) {
            return Err(FormatError::DelimiterContainsQuote {
                delimiter,
                quote: self.quote,
            });
        }
        Ok(())
    }
}
