//! Declared parameter types.
//!
//! A test declares one `ArgType` per value parameter. The converter uses it to pick the parsing policy and the engine
//! uses it to check pre-built values handed over by provider functions.

use std::fmt;

/// Describe an enumeration by name and ordered member names.
///
/// ## Notes
/// - Member order is declaration order; enum sources emit rows in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumType {
    /// Build an enum description from a name and member spellings.
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Describe a Rust enum that implements [`ParamEnum`].
    pub fn of<E: ParamEnum>() -> Self {
        Self::new(E::NAME, E::MEMBERS.iter().copied())
    }

    /// Check whether `member` is declared on this enum (exact, case-sensitive).
    pub fn contains(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }

    /// Return the declaration position of `member`, if any.
    pub fn position(&self, member: &str) -> Option<usize> {
        self.members.iter().position(|m| m == member)
    }
}

/// Opt a Rust enum into enum-sourced arguments.
///
/// ## Examples
/// ```rust
/// use paramrun_core::{EnumType, ParamEnum};
///
/// enum Unit { Second, Minute }
///
/// impl ParamEnum for Unit {
///     const NAME: &'static str = "Unit";
///     const MEMBERS: &'static [&'static str] = &["Second", "Minute"];
/// }
///
/// assert_eq!(EnumType::of::<Unit>().members, vec!["Second", "Minute"]);
/// ```
pub trait ParamEnum {
    const NAME: &'static str;
    const MEMBERS: &'static [&'static str];
}

/// Declared type of a value parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgType {
    Str,
    Int,
    Float,
    Bool,
    Char,
    Enum(EnumType),
    DateTime,
    Date,
}

impl ArgType {
    /// Primitive types cannot hold `null`.
    pub fn is_primitive(&self) -> bool {
        matches!(self, ArgType::Int | ArgType::Float | ArgType::Bool | ArgType::Char)
    }

    /// Short type name used in error messages.
    pub fn name(&self) -> &str {
        match self {
            ArgType::Str => "string",
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::Bool => "bool",
            ArgType::Char => "char",
            ArgType::Enum(e) => &e.name,
            ArgType::DateTime => "datetime",
            ArgType::Date => "date",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Planet {
        Mercury,
        Venus,
    }

    impl ParamEnum for Planet {
        const NAME: &'static str = "Planet";
        const MEMBERS: &'static [&'static str] = &["Mercury", "Venus"];
    }

    #[test]
    fn test_enum_type_of_keeps_declaration_order() {
        let _ = (Planet::Mercury, Planet::Venus);
        let ty = EnumType::of::<Planet>();
        assert_eq!(ty.name, "Planet");
        assert_eq!(ty.position("Venus"), Some(1));
        assert!(!ty.contains("venus"));
    }

    #[test]
    fn test_primitive_types() {
        assert!(ArgType::Int.is_primitive());
        assert!(ArgType::Char.is_primitive());
        assert!(!ArgType::Str.is_primitive());
        assert!(!ArgType::Enum(EnumType::new("E", ["A"])).is_primitive());
    }
}
