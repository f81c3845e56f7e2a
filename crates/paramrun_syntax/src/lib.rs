//! Delimited-text syntax for paramrun argument fixtures: lexer, records, diagnostics, writer.
//!
//! This crate is dependency-light and shared by the engine (inline and file-backed sources), the CLI `preview`
//! command, and the fuzz target.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it splits text into raw fields and knows nothing about argument types,
//!   null markers or empty-value replacements. Those belong to the engine.
//! - A record never spans lines; a line that ends inside a quoted field is an error.
//!
//! ## Examples
//! ```rust
//! use paramrun_syntax::lexer::{self, DelimitedFormat};
//!
//! let records = lexer::lex("I, 1\nII, 2\n", &DelimitedFormat::default()).unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].fields[0].text, "II");
//! ```

pub mod diagnostics;
pub mod lexer;
pub mod record;
pub mod writer;

pub use diagnostics::{FormatError, SyntaxError};
pub use lexer::{Delimiter, DelimitedFormat};
pub use record::{RawField, Record, Span};
