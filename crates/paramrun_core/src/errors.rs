//! Shared user-facing error messages used across the converter, aggregators and reporters.
//!
//! Keeping the wording here lets conversion errors raised by the engine and by aggregator accessors read the same.

/// Message used when a `null` field is bound to a primitive parameter.
pub const NULL_TO_PRIMITIVE_MSG: &str = "cannot convert null to a primitive value";
/// Message used when a boolean literal is neither `true` nor `false`.
pub const INVALID_BOOL_MSG: &str = "expected 'true' or 'false' (case-insensitive)";
/// Message used when a character parameter receives more or less than one character.
pub const INVALID_CHAR_MSG: &str = "expected exactly one character";
