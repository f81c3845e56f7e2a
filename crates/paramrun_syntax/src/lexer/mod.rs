//! Lexer for delimited argument text
//!
//! Handles:
//! - Single-character and multi-character delimiters
//! - Quoted fields, with a doubled quote standing for a literal quote
//! - Whitespace trimming around fields
//! - Blank lines and `#` comment lines (skipped)
//!
//! ## Module Structure
//!
//! - `format` - Lexer configuration (`DelimitedFormat`, `Delimiter`)

mod format;

pub use format::{Delimiter, DelimitedFormat};

use crate::diagnostics::SyntaxError;
use crate::record::{RawField, Record, Span};

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Per line:
//
// [field start] → skip blanks → quote? ──yes──→ [quoted] → closing quote → skip blanks → delimiter | EOL
//                                  │                 ↓
//                                  no               EOL → UnterminatedQuote
//                                  ↓
//                               [bare] → delimiter | EOL
// ============================================================================

/// Lexer for delimited text.
///
/// Splits source text into [`Record`]s, one per non-blank, non-comment line.
pub struct Lexer<'a> {
    source: &'a str,
    format: &'a DelimitedFormat,
    /// Byte offset of the current line in `source`
    line_start: usize,
    /// 1-based number of the current line
    line_no: usize,
    records: Vec<Record>,
    errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str, format: &'a DelimitedFormat) -> Self {
        Self {
            source,
            format,
            line_start: 0,
            line_no: 0,
            records: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Split the entire source into records.
    ///
    /// Returns every record on success, or every syntax error on failure. Lexing continues past a bad line so all
    /// errors are reported at once.
    pub fn tokenize(mut self) -> Result<Vec<Record>, Vec<SyntaxError>> {
        let source = self.source;
        for raw_line in source.split('\n') {
            self.line_no += 1;
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if !self.is_skipped(line) {
                self.scan_line(line);
            }
            self.line_start += raw_line.len() + 1;
        }

        if self.errors.is_empty() {
            Ok(self.records)
        } else {
            Err(self.errors)
        }
    }

    fn is_skipped(&self, line: &str) -> bool {
        let content = line.trim_start();
        if content.is_empty() {
            return true;
        }
        matches!(self.format.comment, Some(marker) if content.starts_with(marker))
    }

    // ========================================================================
    // Line and field scanning
    // ========================================================================

    fn scan_line(&mut self, line: &str) {
        let mut fields = Vec::new();
        let mut pos = 0;

        loop {
            match self.scan_field(line, &mut pos) {
                Ok(field) => fields.push(field),
                Err(err) => {
                    self.errors.push(err);
                    return;
                }
            }
            // `scan_field` stops at a delimiter or at the end of the line.
            match self.format.delimiter.match_at(&line[pos..]) {
                Some(len) => pos += len,
                None => break,
            }
        }

        self.records.push(Record {
            line: self.line_no,
            span: Span::new(self.line_start, self.line_start + line.len()),
            fields,
        });
    }

    fn scan_field(&self, line: &str, pos: &mut usize) -> Result<RawField, SyntaxError> {
        if self.format.trim_whitespace {
            self.skip_blanks(line, pos);
        }

        if line[*pos..].starts_with(self.format.quote) {
            self.scan_quoted(line, pos)
        } else {
            Ok(self.scan_bare(line, pos))
        }
    }

    fn scan_bare(&self, line: &str, pos: &mut usize) -> RawField {
        let begin = *pos;
        while let Some(c) = line[*pos..].chars().next() {
            if self.format.delimiter.match_at(&line[*pos..]).is_some() {
                break;
            }
            *pos += c.len_utf8();
        }

        let raw = &line[begin..*pos];
        let text = if self.format.trim_whitespace {
            raw.trim_end_matches([' ', '\t'])
        } else {
            raw
        };
        RawField {
            text: text.to_string(),
            quoted: false,
            span: self.span(begin, begin + text.len()),
        }
    }

    fn scan_quoted(&self, line: &str, pos: &mut usize) -> Result<RawField, SyntaxError> {
        let quote = self.format.quote;
        let open = *pos;
        *pos += quote.len_utf8();

        let mut text = String::new();
        loop {
            let Some(c) = line[*pos..].chars().next() else {
                return Err(SyntaxError::UnterminatedQuote {
                    line: self.line_no,
                    span: self.span(open, line.len()).into(),
                });
            };
            *pos += c.len_utf8();
            if c == quote {
                // Doubled quote is a literal quote character
                if line[*pos..].starts_with(quote) {
                    text.push(quote);
                    *pos += quote.len_utf8();
                    continue;
                }
                break;
            }
            text.push(c);
        }
        let close = *pos;

        self.skip_blanks(line, pos);
        if *pos < line.len() && self.format.delimiter.match_at(&line[*pos..]).is_none() {
            return Err(SyntaxError::TextAfterQuote {
                line: self.line_no,
                span: self.span(*pos, *pos + 1).into(),
            });
        }

        Ok(RawField {
            text,
            quoted: true,
            span: self.span(open, close),
        })
    }

    /// Skip spaces and tabs that are not themselves the delimiter.
    fn skip_blanks(&self, line: &str, pos: &mut usize) {
        while let Some(c) = line[*pos..].chars().next() {
            if (c == ' ' || c == '\t') && self.format.delimiter.match_at(&line[*pos..]).is_none() {
                *pos += 1;
            } else {
                break;
            }
        }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.line_start + start, self.line_start + end)
    }
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source, format).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str, format: &DelimitedFormat) -> Result<Vec<Record>, Vec<SyntaxError>> {
    Lexer::new(source, format).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================
