//! Display names for invocations
//!
//! A template is plain text with `{token}` placeholders:
//!
//! | Token                   | Expands to                                             |
//! |-------------------------|--------------------------------------------------------|
//! | `{index}`               | 1-based invocation index                               |
//! | `{arguments}`           | all arguments, quoted, joined by `", "`                |
//! | `{argumentsWithNames}`  | `name = value` pairs, quoted like `{arguments}`        |
//! | `{displayName}`         | display name of the definition                         |
//! | `{label}`               | row label, empty when the row has none                 |
//! | `{N}`                   | argument `N` (0-based) in its plain form               |
//!
//! Unknown tokens, out-of-range positions and unmatched braces are copied through unchanged.

use paramrun_core::ArgumentValue;
use paramrun_core::strings::{quoted, truncate_chars};

/// Everything a template can refer to.
#[derive(Debug, Clone, Copy)]
pub struct NameContext<'a> {
    pub index: usize,
    pub display_name: &'a str,
    pub label: Option<&'a str>,
    pub arguments: &'a [ArgumentValue],
    /// Names for `{argumentsWithNames}`; missing positions fall back to `argN`
    pub names: &'a [String],
    /// 0 disables truncation
    pub max_argument_length: usize,
}

impl NameContext<'_> {
    fn plain(&self, value: &ArgumentValue) -> String {
        truncate_chars(&value.to_string(), self.max_argument_length)
    }

    fn quoted(&self, value: &ArgumentValue) -> String {
        match value {
            ArgumentValue::Str(s) => quoted(&ArgumentValue::Str(truncate_chars(s, self.max_argument_length))),
            ArgumentValue::Char(_) => quoted(value),
            other => self.plain(other),
        }
    }

    fn name_of(&self, position: usize) -> String {
        self.names
            .get(position)
            .cloned()
            .unwrap_or_else(|| format!("arg{position}"))
    }

    fn expand(&self, token: &str) -> Option<String> {
        match token {
            "index" => Some(self.index.to_string()),
            "displayName" => Some(self.display_name.to_string()),
            "label" => Some(self.label.unwrap_or_default().to_string()),
            "arguments" => Some(
                self.arguments
                    .iter()
                    .map(|v| self.quoted(v))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            "argumentsWithNames" => Some(
                self.arguments
                    .iter()
                    .enumerate()
                    .map(|(i, v)| format!("{} = {}", self.name_of(i), self.quoted(v)))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) => {
                let position: usize = token.parse().ok()?;
                self.arguments.get(position).map(|v| self.plain(v))
            }
            _ => None,
        }
    }
}

/// Render `template` against `ctx`.
///
/// ## Examples
/// ```rust
/// use paramrun::display::{format, NameContext};
/// use paramrun_core::ArgumentValue;
///
/// let args = [ArgumentValue::from("foo")];
/// let ctx = NameContext {
///     index: 1,
///     display_name: "words",
///     label: None,
///     arguments: &args,
///     names: &[],
///     max_argument_length: 512,
/// };
/// assert_eq!(format("{index} => {0}", &ctx), "1 => foo");
/// ```
pub fn format(template: &str, ctx: &NameContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}');
        let reopen = after.find('{');
        match close {
            // `{` with another `{` before its `}`: the first one is literal
            Some(close) if reopen.is_none_or(|r| r > close) => {
                let token = &after[..close];
                match ctx.expand(token) {
                    Some(text) => out.push_str(&text),
                    None => {
                        out.push('{');
                        out.push_str(token);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            Some(_) => {
                out.push('{');
                rest = after;
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(args: &'a [ArgumentValue], names: &'a [String]) -> NameContext<'a> {
        NameContext {
            index: 3,
            display_name: "Roman numeral",
            label: None,
            arguments: args,
            names,
            max_argument_length: 512,
        }
    }

    #[test]
    fn test_positional_tokens_are_unquoted() {
        let args = [ArgumentValue::from("III"), ArgumentValue::Int(3)];
        assert_eq!(format("\"{0}\" should be {1}", &ctx(&args, &[])), "\"III\" should be 3");
    }

    #[test]
    fn test_arguments_are_quoted() {
        let args = [
            ArgumentValue::from("a \"b\""),
            ArgumentValue::Char('c'),
            ArgumentValue::Null,
            ArgumentValue::Float(1.0),
        ];
        assert_eq!(format("{arguments}", &ctx(&args, &[])), r#""a \"b\"", 'c', null, 1.0"#);
    }

    #[test]
    fn test_arguments_with_names_falls_back_to_positions() {
        let args = [ArgumentValue::from("hello"), ArgumentValue::Int(5)];
        let names = vec!["word".to_string()];
        assert_eq!(
            format("[{index}] {argumentsWithNames}", &ctx(&args, &names)),
            "[3] word = \"hello\", arg1 = 5"
        );
    }

    #[test]
    fn test_unknown_tokens_and_braces_pass_through() {
        let args = [ArgumentValue::Int(1)];
        let c = ctx(&args, &[]);
        assert_eq!(format("{nope} {7} {", &c), "{nope} {7} {");
        assert_eq!(format("{{index}}", &c), "{3}");
        assert_eq!(format("}{}", &c), "}{}");
    }

    #[test]
    fn test_display_name_and_label() {
        let args = [ArgumentValue::Int(1)];
        let mut c = ctx(&args, &[]);
        assert_eq!(format("{displayName}: {label}", &c), "Roman numeral: ");
        c.label = Some("first");
        assert_eq!(format("{displayName}: {label}", &c), "Roman numeral: first");
    }

    #[test]
    fn test_long_arguments_are_truncated() {
        let args = [ArgumentValue::from("abcdefghij")];
        let mut c = ctx(&args, &[]);
        c.max_argument_length = 4;
        assert_eq!(format("{0} {arguments}", &c), "abc… \"abc…\"");
    }
}
