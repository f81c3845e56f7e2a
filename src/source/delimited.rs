//! Delimited text to argument rows.
//!
//! Lexing happens eagerly so malformed text fails the whole definition before anything runs. Mapping lexed records
//! to rows is lazy.

use miette::NamedSource;
use paramrun_syntax::{RawField, Record, lexer};

use super::{ArgumentRow, Field};
use crate::config::DelimitedOptions;
use crate::errors::ConfigurationError;

pub(super) struct ParsedText {
    pub rows: Box<dyn Iterator<Item = ArgumentRow>>,
    pub headers: Option<Vec<String>>,
}

/// Lex `text` with `options`, using `default_quote` when no quote is configured.
pub(super) fn parse(
    text: &str,
    origin: &str,
    options: &DelimitedOptions,
    default_quote: char,
) -> Result<ParsedText, ConfigurationError> {
    let format = options.to_format(default_quote)?;
    let body = skip_lines(text, options.skip_lines);

    let records = lexer::lex(body, &format).map_err(|errors| {
        tracing::debug!(origin, error_count = errors.len(), "delimited text failed to lex");
        ConfigurationError::Malformed {
            origin: origin.to_string(),
            src: NamedSource::new(origin, body.to_string()),
            errors,
        }
    })?;

    let mut records = records.into_iter();
    let headers = if options.use_headers {
        records
            .next()
            .map(|header| header.fields.into_iter().map(|f| f.text).collect())
    } else {
        None
    };

    let empty_value = options.empty_value.clone();
    let null_values = options.null_values.clone();
    let rows = records.map(move |record| to_row(record, empty_value.as_deref(), &null_values));

    Ok(ParsedText {
        rows: Box::new(rows),
        headers,
    })
}

fn skip_lines(text: &str, count: usize) -> &str {
    let mut rest = text;
    for _ in 0..count {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

fn to_row(record: Record, empty_value: Option<&str>, null_values: &[String]) -> ArgumentRow {
    ArgumentRow::new(
        record
            .fields
            .into_iter()
            .map(|field| to_field(field, empty_value, null_values))
            .collect(),
    )
}

fn to_field(field: RawField, empty_value: Option<&str>, null_values: &[String]) -> Field {
    if field.is_blank() {
        return match empty_value {
            Some(replacement) => Field::Text(replacement.to_string()),
            None => Field::Null,
        };
    }
    if field.quoted {
        return Field::Text(field.text);
    }
    if null_values.iter().any(|n| *n == field.text) {
        Field::Null
    } else {
        Field::Text(field.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str, options: &DelimitedOptions) -> Vec<Vec<Field>> {
        parse(text, "test", options, '\'')
            .unwrap()
            .rows
            .map(|r| r.fields().to_vec())
            .collect()
    }

    fn text(s: &str) -> Field {
        Field::Text(s.to_string())
    }

    #[test]
    fn test_blank_field_is_null_and_quoted_empty_is_empty() {
        let parsed = rows("a,,''", &DelimitedOptions::default());
        assert_eq!(parsed, vec![vec![text("a"), Field::Null, text("")]]);
    }

    #[test]
    fn test_empty_value_replaces_blank_fields_only() {
        let options = DelimitedOptions::new().with_empty_value("EMPTY");
        let parsed = rows("'',", &options);
        assert_eq!(parsed, vec![vec![text(""), text("EMPTY")]]);
    }

    #[test]
    fn test_null_values_apply_to_bare_fields() {
        let options = DelimitedOptions::new().with_null_values(["N/A"]);
        let parsed = rows("N/A,'N/A'", &options);
        assert_eq!(parsed, vec![vec![Field::Null, text("N/A")]]);
    }

    #[test]
    fn test_headers_are_not_data() {
        let options = DelimitedOptions::new().with_headers(true);
        let parsed = parse("name, age\nAda, 36", "test", &options, '"').unwrap();
        assert_eq!(parsed.headers, Some(vec!["name".to_string(), "age".to_string()]));
        let data: Vec<ArgumentRow> = parsed.rows.collect();
        assert_eq!(data, vec![ArgumentRow::of_texts(["Ada", "36"])]);
    }

    #[test]
    fn test_skip_lines_drops_leading_lines() {
        let options = DelimitedOptions::new().with_skip_lines(2);
        let parsed = rows("junk 'unbalanced\nmore junk\n1,2", &options);
        assert_eq!(parsed, vec![vec![text("1"), text("2")]]);
    }

    #[test]
    fn test_skip_more_lines_than_exist() {
        assert!(rows("1,2", &DelimitedOptions::new().with_skip_lines(5)).is_empty());
    }

    #[test]
    fn test_malformed_text_reports_every_error() {
        let result = parse("'open\nok\n'also open", "inline text", &DelimitedOptions::default(), '\'');
        match result {
            Err(ConfigurationError::Malformed { origin, errors, .. }) => {
                assert_eq!(origin, "inline text");
                assert_eq!(errors.iter().map(|e| e.line()).collect::<Vec<_>>(), vec![1, 3]);
            }
            _ => panic!("expected Malformed"),
        }
    }
}
