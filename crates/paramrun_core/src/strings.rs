//! Define shared string semantics for rendering arguments into display names.
//!
//! ## Notes
//! - **Quoted form**: used by the catch-all `{arguments}` placeholders. Strings are wrapped in double quotes and
//!   escaped, characters in single quotes; every other value uses its plain string form.
//! - **Plain form**: used by positional placeholders; this is `ArgumentValue`'s `Display`.
//! - **Truncation**: counts Unicode scalars, not bytes.

use crate::value::ArgumentValue;

/// Marker appended to truncated argument text.
pub const ELLIPSIS: char = '…';

/// Render `value` in its quoted display form.
///
/// ## Examples
/// ```rust
/// use paramrun_core::strings::quoted;
/// use paramrun_core::ArgumentValue;
///
/// assert_eq!(quoted(&ArgumentValue::from("say \"hi\"")), r#""say \"hi\"""#);
/// assert_eq!(quoted(&ArgumentValue::Char('x')), "'x'");
/// assert_eq!(quoted(&ArgumentValue::Int(3)), "3");
/// ```
pub fn quoted(value: &ArgumentValue) -> String {
    match value {
        ArgumentValue::Str(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('"');
            push_escaped(&mut out, s, '"');
            out.push('"');
            out
        }
        ArgumentValue::Char(c) => {
            let mut out = String::with_capacity(3);
            out.push('\'');
            push_escaped(&mut out, c.encode_utf8(&mut [0; 4]), '\'');
            out.push('\'');
            out
        }
        other => other.to_string(),
    }
}

/// Escape `quote`, backslashes and control characters of `s` into `out`.
fn push_escaped(out: &mut String, s: &str, quote: char) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&c.escape_unicode().to_string()),
            c => out.push(c),
        }
    }
}

/// Truncate `s` to at most `max_chars` scalars, replacing the tail with [`ELLIPSIS`].
///
/// ## Returns
/// - `s` unchanged when it fits; otherwise the first `max_chars - 1` scalars followed by `…`.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if max_chars == 0 || s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push(ELLIPSIS);
    out
}
