//! Scalar parsing policy: raw text to typed [`ArgumentValue`].
//!
//! ## Notes
//! - Conversion is driven by the declared type; there is no type inference.
//! - Precedence of the built-in conversions follows the order of [`parse_scalar`]'s match arms: string pass-through,
//!   numeric, boolean, character, enum member, then date/time.
//! - Date/time patterns are `chrono` format strings supplied by the caller.

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::{INVALID_BOOL_MSG, INVALID_CHAR_MSG};
use crate::types::{ArgType, EnumType};
use crate::value::ArgumentValue;

/// Default pattern for `ArgType::DateTime`.
pub const DEFAULT_DATE_TIME_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";
/// Default pattern for `ArgType::Date`.
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

/// Date/time patterns used when parsing temporal arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalPatterns<'a> {
    pub date_time: &'a str,
    pub date: &'a str,
}

impl Default for TemporalPatterns<'_> {
    fn default() -> Self {
        Self {
            date_time: DEFAULT_DATE_TIME_PATTERN,
            date: DEFAULT_DATE_PATTERN,
        }
    }
}

/// Why a scalar could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// Text is not a valid literal of the target type.
    Invalid { expected: String, detail: String },
    /// Text does not name a member of the target enum.
    UnknownMember { enum_name: String, member: String },
}

impl ParseFailure {
    /// Human-readable description of the failure.
    pub fn message(&self) -> String {
        match self {
            ParseFailure::Invalid { expected, detail } => format!("invalid {expected}: {detail}"),
            ParseFailure::UnknownMember { enum_name, member } => {
                format!("'{member}' is not a member of enum {enum_name}")
            }
        }
    }
}

/// Parse `text` as a value of type `ty`.
///
/// ## Parameters
/// - `text`: the raw field, already unquoted and trimmed by the lexer.
/// - `ty`: the declared parameter type.
/// - `patterns`: chrono patterns for `DateTime` and `Date`.
///
/// ## Returns
/// - (`ArgumentValue`): a value that satisfies `ty`.
///
/// ## Examples
/// ```rust
/// use paramrun_core::parse::{parse_scalar, TemporalPatterns};
/// use paramrun_core::{ArgType, ArgumentValue};
///
/// let v = parse_scalar("TRUE", &ArgType::Bool, TemporalPatterns::default()).unwrap();
/// assert_eq!(v, ArgumentValue::Bool(true));
/// ```
pub fn parse_scalar(text: &str, ty: &ArgType, patterns: TemporalPatterns<'_>) -> Result<ArgumentValue, ParseFailure> {
    match ty {
        ArgType::Str => Ok(ArgumentValue::Str(text.to_string())),
        ArgType::Int => text
            .parse::<i64>()
            .map(ArgumentValue::Int)
            .map_err(|e| invalid("int", text, e)),
        ArgType::Float => text
            .parse::<f64>()
            .map(ArgumentValue::Float)
            .map_err(|e| invalid("float", text, e)),
        ArgType::Bool => parse_bool(text).map(ArgumentValue::Bool).ok_or_else(|| ParseFailure::Invalid {
            expected: "bool".to_string(),
            detail: format!("'{text}': {INVALID_BOOL_MSG}"),
        }),
        ArgType::Char => parse_char(text).map(ArgumentValue::Char).ok_or_else(|| ParseFailure::Invalid {
            expected: "char".to_string(),
            detail: format!("'{text}': {INVALID_CHAR_MSG}"),
        }),
        ArgType::Enum(e) => parse_enum_member(text, e),
        ArgType::DateTime => NaiveDateTime::parse_from_str(text, patterns.date_time)
            .map(ArgumentValue::DateTime)
            .map_err(|e| invalid("datetime", text, e)),
        ArgType::Date => NaiveDate::parse_from_str(text, patterns.date)
            .map(ArgumentValue::Date)
            .map_err(|e| invalid("date", text, e)),
    }
}

/// Parse `true`/`false`, ignoring ASCII case.
pub fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a text made of exactly one Unicode scalar.
pub fn parse_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Look up an enum member by its exact spelling.
pub fn parse_enum_member(text: &str, ty: &EnumType) -> Result<ArgumentValue, ParseFailure> {
    if ty.contains(text) {
        Ok(ArgumentValue::Enum {
            type_name: ty.name.clone(),
            member: text.to_string(),
        })
    } else {
        Err(ParseFailure::UnknownMember {
            enum_name: ty.name.clone(),
            member: text.to_string(),
        })
    }
}

fn invalid(expected: &str, text: &str, err: impl std::fmt::Display) -> ParseFailure {
    ParseFailure::Invalid {
        expected: expected.to_string(),
        detail: format!("'{text}': {err}"),
    }
}
