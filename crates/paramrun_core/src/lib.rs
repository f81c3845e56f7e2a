//! Provide the argument value model and pure conversion helpers shared by the paramrun engine and its tooling.
//!
//! This crate is intentionally small and dependency-light. It contains deterministic helpers that both:
//! - the row converter uses to turn raw text fields into typed arguments, and
//! - the display-name formatter uses to render those arguments back into text.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, and no engine-specific types.
//! - Current scope: declared argument types (`ArgType`, `EnumType`), the `ArgumentValue` tagged union, scalar parsing
//!   policy, display quoting, and shared error messages.

pub mod errors;
pub mod parse;
pub mod strings;
pub mod types;
pub mod value;

pub use types::{ArgType, EnumType, ParamEnum};
pub use value::ArgumentValue;
