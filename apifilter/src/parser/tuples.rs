//! Tuple column strategies

use serde_json::Value as JsonValue;

use crate::core::constants::{FILTER_EQUALS, FILTER_IN};
use crate::domain::filter::Filter;
use crate::error::{FilterError, Result};
use crate::utils::format::format_for_error;

use super::Parser;
use super::context::ParseContext;
use super::tuple::{Tuple, is_tuple, is_tuple_str, split_column};

/// `(a, b[gt])=(1, 2)`: positional filters
///
/// A column token carrying a filter uses it, other positions use `in` for
/// list values and `eq` otherwise.
pub struct TupleColumnTupleValueParser;

impl Parser for TupleColumnTupleValueParser {
    fn name(&self) -> &'static str {
        "tuple_column_tuple_value"
    }

    fn supports(
        &self,
        _context: &ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<bool> {
        Ok(is_tuple_str(column) && is_tuple(value))
    }

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        let columns = Tuple::parse(column)?.columns();
        let raw_value = value.as_str().unwrap_or_default();
        let values = Tuple::parse_with_count(raw_value, columns.len())?.values()?;

        columns
            .iter()
            .zip(values)
            .map(|(column, value)| {
                let (column, embedded) = split_column(column);
                let filter = match embedded.as_deref() {
                    Some(filter) => filter,
                    None if value.is_array() => FILTER_IN,
                    None => FILTER_EQUALS,
                };
                context.create_filter(&column, filter, value)
            })
            .collect()
    }
}

/// `(a, b)[gt]=(1, 2)`: one filter kind applied across all positions
pub struct TupleColumnArrayValueParser;

impl Parser for TupleColumnArrayValueParser {
    fn name(&self) -> &'static str {
        "tuple_column_array_value"
    }

    fn supports(
        &self,
        _context: &ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<bool> {
        Ok(is_tuple_str(column) && value.is_object())
    }

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        let Some(entries) = value.as_object() else {
            return Ok(Vec::new());
        };
        let columns = Tuple::parse(column)?.columns();
        if columns.iter().any(|name| split_column(name).1.is_some()) {
            return Err(FilterError::FilterInColumnsAndValues);
        }

        let mut filters = Vec::new();
        for (filter, tuple_value) in entries {
            if filter.eq_ignore_ascii_case(FILTER_IN) {
                return Err(FilterError::TupleInInFilter);
            }
            let raw_value = tuple_value.as_str().unwrap_or_default();
            if !is_tuple_str(raw_value) {
                return Err(FilterError::InvalidTupleCombination {
                    column: column.to_string(),
                    value: format_for_error(tuple_value),
                });
            }
            let values = Tuple::parse_with_count(raw_value, columns.len())?.values()?;

            for (column, value) in columns.iter().zip(values) {
                filters.push(context.create_filter(column, filter, value)?);
            }
        }

        Ok(filters)
    }
}

/// A tuple on exactly one side, always an error
pub struct UnsupportedTupleCombinationParser;

impl Parser for UnsupportedTupleCombinationParser {
    fn name(&self) -> &'static str {
        "unsupported_tuple_combination"
    }

    fn supports(
        &self,
        _context: &ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<bool> {
        Ok(is_tuple_str(column) || is_tuple(value))
    }

    fn parse(
        &self,
        _context: &mut ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        Err(FilterError::InvalidTupleCombination {
            column: column.to_string(),
            value: format_for_error(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::filter::{FilterFactory, FilterIn, FilterWithOperator, Operator};
    use crate::domain::functions::Functions;
    use crate::error::ErrorKind;
    use crate::parser::context::QueryParameters;

    fn parse(parser: &dyn Parser, column: &str, value: JsonValue) -> Result<Vec<Filter>> {
        let functions = Functions::new();
        let query = QueryParameters::new();
        let mut context = ParseContext::new(&query, &functions, FilterFactory::new(), "fun");
        parser.parse(&mut context, column, &value)
    }

    #[test]
    fn test_tuple_value_implicit_filters() {
        let filters = parse(
            &TupleColumnTupleValueParser,
            "(firstName, age, size)",
            json!("(Jon, 20, [S; M])"),
        )
        .unwrap();

        assert_eq!(
            filters,
            vec![
                Filter::from(FilterWithOperator::new("firstName", "Jon", Operator::Eq)),
                Filter::from(FilterWithOperator::new("age", 20, Operator::Eq)),
                Filter::from(FilterIn::new("size", json!(["S", "M"])).unwrap()),
            ]
        );
    }

    #[test]
    fn test_tuple_value_filters_in_columns() {
        let filters = parse(
            &TupleColumnTupleValueParser,
            "(age[gt], age[lt])",
            json!("(18, 30)"),
        )
        .unwrap();

        assert_eq!(
            filters,
            vec![
                Filter::from(FilterWithOperator::new("age", 18, Operator::Gt)),
                Filter::from(FilterWithOperator::new("age", 30, Operator::Lt)),
            ]
        );
    }

    #[test]
    fn test_tuple_value_count_mismatch() {
        let err = parse(
            &TupleColumnTupleValueParser,
            "(col1, col2, col3)",
            json!("(v1, v2)"),
        )
        .unwrap_err();
        assert_eq!(err, FilterError::tuple_count(3, 2));
    }

    #[test]
    fn test_array_value_applies_filter_across_columns() {
        let filters = parse(
            &TupleColumnArrayValueParser,
            "(age, size)",
            json!({"gt": "(18, 2)", "lt": "(30, 5)"}),
        )
        .unwrap();

        assert_eq!(
            filters,
            vec![
                Filter::from(FilterWithOperator::new("age", 18, Operator::Gt)),
                Filter::from(FilterWithOperator::new("size", 2, Operator::Gt)),
                Filter::from(FilterWithOperator::new("age", 30, Operator::Lt)),
                Filter::from(FilterWithOperator::new("size", 5, Operator::Lt)),
            ]
        );
    }

    #[test]
    fn test_array_value_rejects_in() {
        let err = parse(
            &TupleColumnArrayValueParser,
            "(a, b)",
            json!({"in": "([1; 2], [3; 4])"}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Tuples are not allowed in IN filter.");
    }

    #[test]
    fn test_array_value_rejects_filters_in_both_places() {
        let err = parse(
            &TupleColumnArrayValueParser,
            "(a[gt], b)",
            json!({"lt": "(1, 2)"}),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Filters can be specified either in columns or in values - not in both"
        );
        assert_eq!(err.kind(), ErrorKind::Grammar);
    }

    #[test]
    fn test_unsupported_combination_message() {
        let err = parse(
            &UnsupportedTupleCombinationParser,
            "(a, b)",
            json!("scalar"),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid combination of a tuple and a scalar. Column (a, b) and value scalar."
        );

        let err = parse(
            &UnsupportedTupleCombinationParser,
            "(a, b)",
            json!(["x", "y"]),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid combination of a tuple and a scalar. Column (a, b) and value [x, y]."
        );
    }
}
