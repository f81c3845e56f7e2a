//! Argument aggregation
//!
//! An [`Aggregator`] builds one composite value from a whole row. It reads fields through a [`RowAccessor`],
//! whose typed getters run the same conversion rules as value parameters. Accessor failures convert into
//! [`AggregationError`] so aggregators can use `?` throughout.

use paramrun_core::{ArgType, ArgumentValue};

use crate::convert::RowConverter;
use crate::errors::{AggregationError, ConversionError};
use crate::source::{ArgumentRow, Field};

/// Builds one parameter value from a row.
pub trait Aggregator: Send + Sync {
    fn aggregate(&self, row: &RowAccessor<'_>) -> Result<ArgumentValue, AggregationError>;
}

impl<F> Aggregator for F
where
    F: Fn(&RowAccessor<'_>) -> Result<ArgumentValue, AggregationError> + Send + Sync,
{
    fn aggregate(&self, row: &RowAccessor<'_>) -> Result<ArgumentValue, AggregationError> {
        self(row)
    }
}

/// Read access to the raw row of the current invocation.
pub struct RowAccessor<'a> {
    row: &'a ArgumentRow,
    index: usize,
    converter: RowConverter<'a>,
}

impl<'a> RowAccessor<'a> {
    pub fn new(row: &'a ArgumentRow, index: usize, converter: RowConverter<'a>) -> Self {
        Self { row, index, converter }
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
    }

    /// 1-based index of the invocation.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> Option<&str> {
        self.row.label()
    }

    pub fn get_raw(&self, column: usize) -> Result<&'a Field, ConversionError> {
        self.row.fields().get(column).ok_or(ConversionError::MissingColumn {
            index: column,
            len: self.row.len(),
        })
    }

    /// Convert `column` to `ty`.
    pub fn get(&self, column: usize, ty: &ArgType) -> Result<ArgumentValue, ConversionError> {
        self.converter.convert_field(self.get_raw(column)?, column, ty)
    }

    pub fn get_int(&self, column: usize) -> Result<i64, ConversionError> {
        match self.get(column, &ArgType::Int)? {
            ArgumentValue::Int(i) => Ok(i),
            other => Err(mismatch(column, &ArgType::Int, &other)),
        }
    }

    pub fn get_float(&self, column: usize) -> Result<f64, ConversionError> {
        match self.get(column, &ArgType::Float)? {
            ArgumentValue::Float(f) => Ok(f),
            other => Err(mismatch(column, &ArgType::Float, &other)),
        }
    }

    pub fn get_bool(&self, column: usize) -> Result<bool, ConversionError> {
        match self.get(column, &ArgType::Bool)? {
            ArgumentValue::Bool(b) => Ok(b),
            other => Err(mismatch(column, &ArgType::Bool, &other)),
        }
    }

    /// `None` when the field is null.
    pub fn get_str(&self, column: usize) -> Result<Option<String>, ConversionError> {
        match self.get(column, &ArgType::Str)? {
            ArgumentValue::Str(s) => Ok(Some(s)),
            ArgumentValue::Null => Ok(None),
            other => Err(mismatch(column, &ArgType::Str, &other)),
        }
    }
}

fn mismatch(index: usize, expected: &ArgType, actual: &ArgumentValue) -> ConversionError {
    ConversionError::TypeMismatch {
        index,
        expected: expected.to_string(),
        actual: actual.kind_name().to_string(),
    }
}
