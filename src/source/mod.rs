//! Argument sources
//!
//! A [`SourceDescriptor`] is static configuration attached to a test definition. Opening it yields an
//! [`ArgumentSource`]: a finite, non-restartable iterator of [`ArgumentRow`]s. Every run opens a fresh source.
//!
//! ## Source kinds
//!
//! - `Literal` - one single-column row per value
//! - `Delimited` / `DelimitedFile` - delimited text, inline or read once from a file
//! - `Enum` - one row per enum member, optionally filtered
//! - `Method` - rows built by a provider function registered in a [`ProviderRegistry`]
//!
//! Everything that can go wrong with a source (unknown provider, unreadable file, malformed text, unknown enum
//! member, no rows at all) is detected while opening it, before any invocation runs.

mod delimited;
mod registry;

pub use registry::{Provider, ProviderRegistry};

use std::iter::Peekable;
use std::path::PathBuf;

use paramrun_core::{ArgumentValue, EnumType, ParamEnum};

use crate::config::DelimitedOptions;
use crate::errors::ConfigurationError;

// ============================================================================
// Rows
// ============================================================================

/// One raw field of an argument row.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Text still to be converted to the declared type
    Text(String),
    /// Absent value
    Null,
    /// Value already built by a provider function
    Value(ArgumentValue),
}

impl Field {
    /// Text form used when a display name has to be rendered from the raw row.
    pub fn to_display_value(&self) -> ArgumentValue {
        match self {
            Field::Text(s) => ArgumentValue::Str(s.clone()),
            Field::Null => ArgumentValue::Null,
            Field::Value(v) => v.clone(),
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Text(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Text(s)
    }
}

impl From<ArgumentValue> for Field {
    fn from(v: ArgumentValue) -> Self {
        Field::Value(v)
    }
}

/// Raw fields destined for one invocation, plus an optional description label.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentRow {
    fields: Vec<Field>,
    label: Option<String>,
}

impl ArgumentRow {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, label: None }
    }

    /// Row of text fields.
    pub fn of_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(|t| Field::Text(t.into())).collect())
    }

    /// Row of pre-built values.
    pub fn of_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = ArgumentValue>,
    {
        Self::new(values.into_iter().map(Field::Value).collect())
    }

    /// Attach a description label, available to display names as `{label}`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Whether an enum filter keeps or drops the named members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Include,
    Exclude,
}

/// Restrict an enum source to a subset of members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumFilter {
    pub mode: FilterMode,
    pub names: Vec<String>,
}

impl EnumFilter {
    /// Keep only `names`. An empty list keeps every member.
    pub fn include<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: FilterMode::Include,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Drop `names`.
    pub fn exclude<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: FilterMode::Exclude,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    fn keeps(&self, member: &str) -> bool {
        let named = self.names.iter().any(|n| n == member);
        match self.mode {
            FilterMode::Include => self.names.is_empty() || named,
            FilterMode::Exclude => !named,
        }
    }
}

/// How to build the argument source of a test definition.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDescriptor {
    Literal(Vec<String>),
    Delimited { text: String, options: DelimitedOptions },
    DelimitedFile { path: PathBuf, options: DelimitedOptions },
    Enum { ty: EnumType, filter: Option<EnumFilter> },
    Method { name: String },
}

impl SourceDescriptor {
    /// Single-column rows from literal values.
    pub fn literal<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        SourceDescriptor::Literal(values.into_iter().map(|v| v.to_string()).collect())
    }

    /// Inline delimited text, one record per entry.
    pub fn delimited<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = lines.into_iter().map(|l| l.as_ref().to_string()).collect::<Vec<_>>().join("\n");
        Self::delimited_text(text)
    }

    /// Inline delimited text block.
    pub fn delimited_text(text: impl Into<String>) -> Self {
        SourceDescriptor::Delimited {
            text: text.into(),
            options: DelimitedOptions::default(),
        }
    }

    /// Delimited text read from a file when the source is opened.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SourceDescriptor::DelimitedFile {
            path: path.into(),
            options: DelimitedOptions::default(),
        }
    }

    /// Every member of a Rust enum.
    pub fn enum_of<E: ParamEnum>() -> Self {
        Self::enum_type(EnumType::of::<E>())
    }

    pub fn enum_type(ty: EnumType) -> Self {
        SourceDescriptor::Enum { ty, filter: None }
    }

    /// Rows returned by the provider registered under `name`.
    pub fn method(name: impl Into<String>) -> Self {
        SourceDescriptor::Method { name: name.into() }
    }

    /// Replace the options of a delimited source. Other kinds are returned unchanged.
    pub fn with_options(self, options: DelimitedOptions) -> Self {
        match self {
            SourceDescriptor::Delimited { text, .. } => SourceDescriptor::Delimited { text, options },
            SourceDescriptor::DelimitedFile { path, .. } => SourceDescriptor::DelimitedFile { path, options },
            other => other,
        }
    }

    /// Set the filter of an enum source. Other kinds are returned unchanged.
    pub fn with_filter(self, filter: EnumFilter) -> Self {
        match self {
            SourceDescriptor::Enum { ty, .. } => SourceDescriptor::Enum {
                ty,
                filter: Some(filter),
            },
            other => other,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SourceDescriptor::Literal(_) => "literal",
            SourceDescriptor::Delimited { .. } => "delimited",
            SourceDescriptor::DelimitedFile { .. } => "delimited-file",
            SourceDescriptor::Enum { .. } => "enum",
            SourceDescriptor::Method { .. } => "method",
        }
    }
}

// ============================================================================
// Opened sources
// ============================================================================

/// An opened source: a finite iterator of rows.
pub struct ArgumentSource {
    rows: Peekable<Box<dyn Iterator<Item = ArgumentRow>>>,
    column_names: Option<Vec<String>>,
}

impl ArgumentSource {
    /// Open `descriptor`, resolving method references against `registry`.
    ///
    /// ## Errors
    /// Any [`ConfigurationError`]; in particular `NoRows` when the source would produce nothing.
    #[tracing::instrument(skip_all, fields(kind = descriptor.kind_name()))]
    pub fn open(descriptor: &SourceDescriptor, registry: &ProviderRegistry) -> Result<Self, ConfigurationError> {
        let (rows, column_names): (Box<dyn Iterator<Item = ArgumentRow>>, _) = match descriptor {
            SourceDescriptor::Literal(values) => {
                let values = values.clone();
                (Box::new(values.into_iter().map(|v| ArgumentRow::new(vec![Field::Text(v)]))), None)
            }
            SourceDescriptor::Delimited { text, options } => {
                let parsed = delimited::parse(text, "inline text", options, '\'')?;
                (Box::new(parsed.rows), parsed.headers)
            }
            SourceDescriptor::DelimitedFile { path, options } => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigurationError::UnreadableFile {
                    path: path.clone(),
                    source,
                })?;
                let origin = path.display().to_string();
                let parsed = delimited::parse(&text, &origin, options, '"')?;
                (Box::new(parsed.rows), parsed.headers)
            }
            SourceDescriptor::Enum { ty, filter } => (Box::new(enum_rows(ty, filter.as_ref())?), None),
            SourceDescriptor::Method { name } => {
                let provider = registry.resolve(name)?;
                (Box::new(provider().into_iter()), None)
            }
        };

        let mut rows = rows.peekable();
        if rows.peek().is_none() {
            return Err(ConfigurationError::NoRows);
        }
        Ok(Self { rows, column_names })
    }

    /// Column names from a header record, when the source was configured to read one.
    pub fn column_names(&self) -> Option<&[String]> {
        self.column_names.as_deref()
    }
}

impl Iterator for ArgumentSource {
    type Item = ArgumentRow;

    fn next(&mut self) -> Option<ArgumentRow> {
        self.rows.next()
    }
}

fn enum_rows(
    ty: &EnumType,
    filter: Option<&EnumFilter>,
) -> Result<impl Iterator<Item = ArgumentRow> + 'static, ConfigurationError> {
    if let Some(filter) = filter {
        let missing: Vec<String> = filter.names.iter().filter(|n| !ty.contains(n)).cloned().collect();
        if !missing.is_empty() {
            return Err(ConfigurationError::UnknownEnumMembers {
                enum_name: ty.name.clone(),
                missing,
            });
        }
    }

    let type_name = ty.name.clone();
    let members: Vec<String> = ty
        .members
        .iter()
        .filter(|m| filter.is_none_or(|f| f.keeps(m)))
        .cloned()
        .collect();

    Ok(members.into_iter().map(move |member| {
        ArgumentRow::new(vec![Field::Value(ArgumentValue::Enum {
            type_name: type_name.clone(),
            member,
        })])
    }))
}
