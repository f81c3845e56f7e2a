//! Row conversion
//!
//! Turns the raw fields of an [`ArgumentRow`] into typed values for the value parameters of a definition.
//!
//! ## Notes
//! - **Text fields** go through [`parse_scalar`] with the engine's date/time patterns.
//! - **Null fields** become `ArgumentValue::Null` for object types and fail for primitives.
//! - **Pre-built values** must already satisfy the declared type. A string value is re-parsed as text, and an
//!   int value widens to float when the float is exact.
//! - **Column count** must match the value parameters exactly, unless the definition aggregates; then the row
//!   needs at least one column per value parameter and every column an aggregator reads.

use paramrun_core::parse::{TemporalPatterns, parse_scalar};
use paramrun_core::{ArgType, ArgumentValue};

use crate::config::EngineConfig;
use crate::definition::{Param, ParamKind};
use crate::errors::ConversionError;
use crate::source::{ArgumentRow, Field};

/// How many columns a row must have for a parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    Exact(usize),
    AtLeast(usize),
}

impl ColumnRule {
    /// Derive the rule from the declared parameters. Context parameters do not count.
    pub fn for_params(params: &[Param]) -> Self {
        let mut values = 0;
        let mut aggregated = false;
        let mut highest_read = 0;
        for param in params {
            match &param.kind {
                ParamKind::Value(_) => values += 1,
                ParamKind::Aggregate { columns, .. } => {
                    aggregated = true;
                    if let Some(max) = columns.iter().max() {
                        highest_read = highest_read.max(max.saturating_add(1));
                    }
                }
                ParamKind::TestInfo | ParamKind::Reporter => {}
            }
        }
        if aggregated {
            ColumnRule::AtLeast(values.max(highest_read))
        } else {
            ColumnRule::Exact(values)
        }
    }

    pub fn check(self, actual: usize) -> Result<(), ConversionError> {
        match self {
            ColumnRule::Exact(expected) if actual != expected => Err(ConversionError::ColumnCount { expected, actual }),
            ColumnRule::AtLeast(required) if actual < required => {
                Err(ConversionError::TooFewColumns { required, actual })
            }
            _ => Ok(()),
        }
    }
}

/// Converts raw fields using a fixed set of date/time patterns.
#[derive(Debug, Clone, Copy)]
pub struct RowConverter<'a> {
    patterns: TemporalPatterns<'a>,
}

impl<'a> RowConverter<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            patterns: config.temporal_patterns(),
        }
    }

    pub fn with_patterns(patterns: TemporalPatterns<'a>) -> Self {
        Self { patterns }
    }

    /// Convert a single field, reported as argument `index` on failure.
    pub fn convert_field(&self, field: &Field, index: usize, ty: &ArgType) -> Result<ArgumentValue, ConversionError> {
        match field {
            Field::Text(text) => self.parse_text(text, index, ty),
            Field::Null | Field::Value(ArgumentValue::Null) => null_for(index, ty),
            Field::Value(ArgumentValue::Str(text)) => self.parse_text(text, index, ty),
            Field::Value(ArgumentValue::Int(i)) if *ty == ArgType::Float => ArgumentValue::int_as_exact_float(*i)
                .map(ArgumentValue::Float)
                .ok_or_else(|| ConversionError::Invalid {
                    index,
                    message: format!("{i} has no exact float representation"),
                }),
            Field::Value(value) if value.satisfies(ty) => Ok(value.clone()),
            Field::Value(value) => Err(ConversionError::TypeMismatch {
                index,
                expected: ty.to_string(),
                actual: value.kind_name().to_string(),
            }),
        }
    }

    /// Convert the columns bound to value parameters, after checking the row's column count.
    ///
    /// ## Returns
    /// One value per value parameter, in declaration order. Aggregated and context parameters are not bound
    /// here.
    pub fn convert(&self, row: &ArgumentRow, params: &[Param]) -> Result<Vec<ArgumentValue>, ConversionError> {
        ColumnRule::for_params(params).check(row.len())?;
        params
            .iter()
            .filter_map(Param::value_type)
            .zip(row.fields())
            .enumerate()
            .map(|(index, (ty, field))| self.convert_field(field, index, ty))
            .collect()
    }

    fn parse_text(&self, text: &str, index: usize, ty: &ArgType) -> Result<ArgumentValue, ConversionError> {
        parse_scalar(text, ty, self.patterns).map_err(|failure| ConversionError::Invalid {
            index,
            message: failure.message(),
        })
    }
}

/// Convert `row` for `params` using the patterns in `config`.
pub fn convert(row: &ArgumentRow, params: &[Param], config: &EngineConfig) -> Result<Vec<ArgumentValue>, ConversionError> {
    RowConverter::new(config).convert(row, params)
}

fn null_for(index: usize, ty: &ArgType) -> Result<ArgumentValue, ConversionError> {
    if ty.is_primitive() {
        Err(ConversionError::NullToPrimitive {
            index,
            ty: ty.to_string(),
        })
    } else {
        Ok(ArgumentValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AggregationError;
    use chrono::NaiveDate;
    use paramrun_core::EnumType;

    fn params(types: &[ArgType]) -> Vec<Param> {
        types
            .iter()
            .enumerate()
            .map(|(i, ty)| Param::value(format!("p{i}"), ty.clone()))
            .collect()
    }

    fn first(_: &crate::aggregate::RowAccessor<'_>) -> Result<ArgumentValue, AggregationError> {
        Ok(ArgumentValue::Null)
    }

    #[test]
    fn test_floats_accept_integer_text() {
        let row = ArgumentRow::of_texts(["1", "0", "1"]);
        let values = convert(&row, &params(&[ArgType::Float, ArgType::Float, ArgType::Float]), &EngineConfig::default())
            .unwrap();
        assert_eq!(
            values,
            vec![ArgumentValue::Float(1.0), ArgumentValue::Float(0.0), ArgumentValue::Float(1.0)]
        );
    }

    #[test]
    fn test_column_count_must_match_exactly() {
        let row = ArgumentRow::of_texts(["I", "1", "extra"]);
        let err = convert(&row, &params(&[ArgType::Str, ArgType::Int]), &EngineConfig::default()).unwrap_err();
        assert_eq!(err, ConversionError::ColumnCount { expected: 2, actual: 3 });
    }

    #[test]
    fn test_context_params_do_not_count_as_columns() {
        let mut declared = params(&[ArgType::Str]);
        declared.push(Param::test_info("info"));
        declared.push(Param::reporter("reporter"));
        let row = ArgumentRow::of_texts(["hello"]);
        assert!(convert(&row, &declared, &EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_aggregation_allows_extra_columns() {
        let mut declared = params(&[ArgType::Str]);
        declared.push(Param::aggregate("rest", first, [1, 3]));
        assert_eq!(ColumnRule::for_params(&declared), ColumnRule::AtLeast(4));

        let converter = RowConverter::with_patterns(TemporalPatterns::default());
        let row = ArgumentRow::of_texts(["a", "b", "c", "d", "e"]);
        assert_eq!(converter.convert(&row, &declared).unwrap(), vec![ArgumentValue::from("a")]);

        let short = ArgumentRow::of_texts(["a", "b"]);
        assert_eq!(
            converter.convert(&short, &declared).unwrap_err(),
            ConversionError::TooFewColumns { required: 4, actual: 2 }
        );
    }

    #[test]
    fn test_highest_possible_column_does_not_overflow() {
        let declared = vec![Param::aggregate("far", first, [usize::MAX])];
        assert_eq!(ColumnRule::for_params(&declared), ColumnRule::AtLeast(usize::MAX));
        assert_eq!(
            ColumnRule::for_params(&declared).check(3),
            Err(ConversionError::TooFewColumns { required: usize::MAX, actual: 3 })
        );
    }

    #[test]
    fn test_int_widens_to_float_only_when_exact() {
        let converter = RowConverter::with_patterns(TemporalPatterns::default());
        let exact = Field::Value(ArgumentValue::Int(1 << 53));
        assert_eq!(
            converter.convert_field(&exact, 0, &ArgType::Float).unwrap(),
            ArgumentValue::Float(9_007_199_254_740_992.0)
        );
        let inexact = Field::Value(ArgumentValue::Int(i64::MAX));
        let err = converter.convert_field(&inexact, 1, &ArgType::Float).unwrap_err();
        assert!(matches!(err, ConversionError::Invalid { index: 1, .. }));
        assert!(err.to_string().contains("no exact float representation"), "{err}");
    }

    #[test]
    fn test_null_handling_depends_on_type() {
        let converter = RowConverter::with_patterns(TemporalPatterns::default());
        assert_eq!(converter.convert_field(&Field::Null, 0, &ArgType::Str).unwrap(), ArgumentValue::Null);
        assert!(matches!(
            converter.convert_field(&Field::Null, 2, &ArgType::Int),
            Err(ConversionError::NullToPrimitive { index: 2, .. })
        ));
    }

    #[test]
    fn test_unparsable_literal_names_the_argument() {
        let converter = RowConverter::with_patterns(TemporalPatterns::default());
        let err = converter.convert_field(&Field::from("abc"), 1, &ArgType::Int).unwrap_err();
        assert!(matches!(err, ConversionError::Invalid { index: 1, .. }));
        assert!(err.to_string().starts_with("argument 1: invalid int"));
    }

    #[test]
    fn test_prebuilt_values_are_checked() {
        let converter = RowConverter::with_patterns(TemporalPatterns::default());
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        assert_eq!(
            converter.convert_field(&Field::Value(ArgumentValue::Date(day)), 0, &ArgType::Date).unwrap(),
            ArgumentValue::Date(day)
        );
        assert_eq!(
            converter.convert_field(&Field::Value(ArgumentValue::Int(2)), 0, &ArgType::Float).unwrap(),
            ArgumentValue::Float(2.0)
        );
        assert_eq!(
            converter.convert_field(&Field::Value(ArgumentValue::from("2024-02-29")), 0, &ArgType::Date).unwrap(),
            ArgumentValue::Date(day)
        );
        assert!(matches!(
            converter.convert_field(&Field::Value(ArgumentValue::Bool(true)), 0, &ArgType::Int),
            Err(ConversionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_enum_and_datetime_conversion() {
        let config = EngineConfig::new().with_date_time_pattern("%d.%m.%Y %H:%M");
        let converter = RowConverter::new(&config);
        let unit = ArgType::Enum(EnumType::new("Unit", ["Second", "Minute"]));

        assert_eq!(
            converter.convert_field(&Field::from("Minute"), 0, &unit).unwrap(),
            ArgumentValue::Enum {
                type_name: "Unit".into(),
                member: "Minute".into()
            }
        );
        assert!(converter.convert_field(&Field::from("minute"), 0, &unit).is_err());

        let value = converter.convert_field(&Field::from("01.02.2023 13:45"), 0, &ArgType::DateTime).unwrap();
        assert_eq!(value.to_string(), "2023-02-01T13:45:00");
    }
}
