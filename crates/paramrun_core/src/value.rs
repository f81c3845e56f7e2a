//! The `ArgumentValue` tagged union.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::ArgType;

/// One converted test argument.
///
/// ## Notes
/// - `Null` stands for an absent value and satisfies every non-primitive type.
/// - `Record` is produced by aggregators; it never comes out of plain conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    Enum { type_name: String, member: String },
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Record { type_name: String, fields: Vec<(String, ArgumentValue)> },
}

impl ArgumentValue {
    /// Build a record value from `(name, value)` pairs.
    pub fn record<I, S>(type_name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, ArgumentValue)>,
        S: Into<String>,
    {
        ArgumentValue::Record {
            type_name: type_name.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Widen an `Int` to `f64`, only when the conversion is exact.
    ///
    /// Integers beyond 2^53 in magnitude may not have an exact `f64`; those return `None`.
    pub fn int_as_exact_float(value: i64) -> Option<f64> {
        let widened = value as f64;
        // 2^63 saturates back to i64::MAX, so it must be excluded explicitly
        if widened < 9_223_372_036_854_775_808.0 && widened as i64 == value {
            Some(widened)
        } else {
            None
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ArgumentValue::Null)
    }

    /// Check whether this value can be bound to a parameter declared as `ty`.
    ///
    /// ## Returns
    /// - `true` when the runtime variant matches `ty`, or the value is `Null` and `ty` is not primitive.
    /// - Records only satisfy themselves; aggregated parameters are not checked against an `ArgType`.
    pub fn satisfies(&self, ty: &ArgType) -> bool {
        match (self, ty) {
            (ArgumentValue::Null, ty) => !ty.is_primitive(),
            (ArgumentValue::Str(_), ArgType::Str)
            | (ArgumentValue::Int(_), ArgType::Int)
            | (ArgumentValue::Float(_), ArgType::Float)
            | (ArgumentValue::Bool(_), ArgType::Bool)
            | (ArgumentValue::Char(_), ArgType::Char)
            | (ArgumentValue::DateTime(_), ArgType::DateTime)
            | (ArgumentValue::Date(_), ArgType::Date) => true,
            (ArgumentValue::Enum { type_name, member }, ArgType::Enum(e)) => {
                *type_name == e.name && e.contains(member)
            }
            _ => false,
        }
    }

    /// Short name of the runtime variant, used in mismatch messages.
    pub fn kind_name(&self) -> &str {
        match self {
            ArgumentValue::Null => "null",
            ArgumentValue::Str(_) => "string",
            ArgumentValue::Int(_) => "int",
            ArgumentValue::Float(_) => "float",
            ArgumentValue::Bool(_) => "bool",
            ArgumentValue::Char(_) => "char",
            ArgumentValue::Enum { type_name, .. } => type_name,
            ArgumentValue::DateTime(_) => "datetime",
            ArgumentValue::Date(_) => "date",
            ArgumentValue::Record { type_name, .. } => type_name,
        }
    }

    /// Look up a record field by name.
    pub fn field(&self, name: &str) -> Option<&ArgumentValue> {
        match self {
            ArgumentValue::Record { fields, .. } => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Write a float so that integral values keep a trailing `.0`.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        write!(f, "{v:.1}")
    } else {
        write!(f, "{v}")
    }
}

/// Unquoted string form: the text a positional display placeholder substitutes.
impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Null => f.write_str("null"),
            ArgumentValue::Str(s) => f.write_str(s),
            ArgumentValue::Int(i) => write!(f, "{i}"),
            ArgumentValue::Float(v) => write_float(f, *v),
            ArgumentValue::Bool(b) => write!(f, "{b}"),
            ArgumentValue::Char(c) => write!(f, "{c}"),
            ArgumentValue::Enum { member, .. } => f.write_str(member),
            ArgumentValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            ArgumentValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            ArgumentValue::Record { type_name, fields } => {
                write!(f, "{type_name}(")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<&str> for ArgumentValue {
    fn from(s: &str) -> Self {
        ArgumentValue::Str(s.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(s: String) -> Self {
        ArgumentValue::Str(s)
    }
}

impl From<i64> for ArgumentValue {
    fn from(i: i64) -> Self {
        ArgumentValue::Int(i)
    }
}

impl From<f64> for ArgumentValue {
    fn from(v: f64) -> Self {
        ArgumentValue::Float(v)
    }
}

impl From<bool> for ArgumentValue {
    fn from(b: bool) -> Self {
        ArgumentValue::Bool(b)
    }
}

impl From<char> for ArgumentValue {
    fn from(c: char) -> Self {
        ArgumentValue::Char(c)
    }
}

impl<T: Into<ArgumentValue>> From<Option<T>> for ArgumentValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ArgumentValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnumType;

    #[test]
    fn test_int_widening_is_exact_or_refused() {
        assert_eq!(ArgumentValue::int_as_exact_float(-3), Some(-3.0));
        assert_eq!(ArgumentValue::int_as_exact_float(1 << 53), Some(9_007_199_254_740_992.0));
        assert_eq!(ArgumentValue::int_as_exact_float(i64::MIN), Some(-9_223_372_036_854_775_808.0));
        assert_eq!(ArgumentValue::int_as_exact_float((1 << 53) + 1), None);
        assert_eq!(ArgumentValue::int_as_exact_float(i64::MAX), None);
    }

    #[test]
    fn test_null_satisfies_only_object_types() {
        assert!(ArgumentValue::Null.satisfies(&ArgType::Str));
        assert!(ArgumentValue::Null.satisfies(&ArgType::Date));
        assert!(!ArgumentValue::Null.satisfies(&ArgType::Int));
        assert!(!ArgumentValue::Null.satisfies(&ArgType::Bool));
    }

    #[test]
    fn test_enum_satisfies_checks_type_and_member() {
        let ty = ArgType::Enum(EnumType::new("Color", ["Red", "Green"]));
        let red = ArgumentValue::Enum {
            type_name: "Color".into(),
            member: "Red".into(),
        };
        let blue = ArgumentValue::Enum {
            type_name: "Color".into(),
            member: "Blue".into(),
        };
        assert!(red.satisfies(&ty));
        assert!(!blue.satisfies(&ty));
        assert!(!ArgumentValue::from("Red").satisfies(&ty));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(ArgumentValue::Float(1.0).to_string(), "1.0");
        assert_eq!(ArgumentValue::Float(1.414).to_string(), "1.414");
        assert_eq!(ArgumentValue::from("foo").to_string(), "foo");
        assert_eq!(ArgumentValue::Null.to_string(), "null");
        let point = ArgumentValue::record("Point", [("x", ArgumentValue::Int(1)), ("y", ArgumentValue::Int(2))]);
        assert_eq!(point.to_string(), "Point(x=1, y=2)");
        assert_eq!(point.field("y"), Some(&ArgumentValue::Int(2)));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(ArgumentValue::from(None::<i64>), ArgumentValue::Null);
        assert_eq!(ArgumentValue::from(Some(3_i64)), ArgumentValue::Int(3));
    }
}
