//! Write fields back into a delimited line.
//!
//! The writer is the inverse of the lexer: lexing the output of [`write_record`] with the same format yields the
//! original fields. `None` is written as a blank field and `Some("")` as an empty quoted field, so the distinction
//! between absent and empty survives the round trip.

use crate::lexer::DelimitedFormat;

/// Join `fields` into a single line using `format`, quoting where needed.
///
/// ## Examples
/// ```rust
/// use paramrun_syntax::writer::write_record;
/// use paramrun_syntax::DelimitedFormat;
///
/// let line = write_record(&[Some("a, b"), None, Some("")], &DelimitedFormat::default());
/// assert_eq!(line, "'a, b',,''");
/// ```
pub fn write_record(fields: &[Option<&str>], format: &DelimitedFormat) -> String {
    let line = join(fields, format, None);
    if !line.trim_start().is_empty() {
        return line;
    }
    // A whitespace-only line reads as blank, so quote the last present field.
    // With a whitespace delimiter, a record of nulls only has no written form.
    match fields.iter().rposition(Option::is_some) {
        Some(last) => join(fields, format, Some(last)),
        None => line,
    }
}

fn join(fields: &[Option<&str>], format: &DelimitedFormat, force_quote: Option<usize>) -> String {
    let delimiter = format.delimiter.as_string();
    let mut out = String::new();

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(&delimiter);
        }
        let Some(text) = field else {
            continue;
        };
        let leading = out.trim_start().is_empty();
        if force_quote == Some(i) || needs_quotes(text, leading, format) {
            push_quoted(&mut out, text, format.quote);
        } else {
            out.push_str(text);
        }
    }
    out
}

/// `leading` is set while everything written so far is whitespace, i.e. `text` starts the line's content.
fn needs_quotes(text: &str, leading: bool, format: &DelimitedFormat) -> bool {
    if text.is_empty() {
        return true;
    }
    if text.contains(format.quote) || text.contains(['\n', '\r']) {
        return true;
    }
    if format.delimiter.as_string().chars().any(|c| text.contains(c)) {
        return true;
    }
    if format.trim_whitespace && text != text.trim_matches([' ', '\t']) {
        return true;
    }
    // Content must not look like a comment
    leading && matches!(format.comment, Some(marker) if text.trim_start().starts_with(marker))
}

fn push_quoted(out: &mut String, text: &str, quote: char) {
    out.push(quote);
    for c in text.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
}
