//! Single column strategies

use serde_json::Value as JsonValue;

use crate::core::constants::{FILTER_EQUALS, FILTER_IN};
use crate::domain::filter::Filter;
use crate::error::Result;

use super::Parser;
use super::context::ParseContext;
use super::tuple::{is_tuple, is_tuple_str, split_column};

/// `col[gt]=1&col[lt]=5`: one filter per map entry
pub struct SingleColumnArrayValueParser;

impl Parser for SingleColumnArrayValueParser {
    fn name(&self) -> &'static str {
        "single_column_array_value"
    }

    fn supports(
        &self,
        _context: &ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<bool> {
        Ok(!is_tuple_str(column) && value.is_object())
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

        entries
            .iter()
            .map(|(filter, value)| context.create_filter(column, filter, value))
            .collect()
    }
}

/// `col=v`: implicit `eq`, or `in` for a list value
///
/// A column written as `col[gt]` uses the embedded filter instead.
pub struct SingleColumnScalarParser;

impl Parser for SingleColumnScalarParser {
    fn name(&self) -> &'static str {
        "single_column_scalar"
    }

    fn supports(
        &self,
        _context: &ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<bool> {
        Ok(!is_tuple_str(column) && !value.is_object() && !is_tuple(value))
    }

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        let (column, embedded) = split_column(column);
        let filter = match embedded.as_deref() {
            Some(filter) => filter,
            None if value.is_array() => FILTER_IN,
            None => FILTER_EQUALS,
        };

        Ok(vec![context.create_filter(&column, filter, value)?])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::filter::{FilterFactory, FilterIn, FilterWithOperator, Operator};
    use crate::domain::functions::Functions;
    use crate::parser::context::QueryParameters;

    fn parse(parser: &dyn Parser, column: &str, value: JsonValue) -> Result<Vec<Filter>> {
        let functions = Functions::new();
        let query = QueryParameters::new();
        let mut context = ParseContext::new(&query, &functions, FilterFactory::new(), "fun");
        parser.parse(&mut context, column, &value)
    }

    fn supports(parser: &dyn Parser, column: &str, value: JsonValue) -> bool {
        let functions = Functions::new();
        let query = QueryParameters::new();
        let context = ParseContext::new(&query, &functions, FilterFactory::new(), "fun");
        parser.supports(&context, column, &value).unwrap()
    }

    #[test]
    fn test_array_value_supports() {
        let parser = SingleColumnArrayValueParser;
        assert!(supports(&parser, "age", json!({"gt": 18})));
        assert!(!supports(&parser, "age", json!(18)));
        assert!(!supports(&parser, "(a,b)", json!({"gt": "(1,2)"})));
    }

    #[test]
    fn test_array_value_emits_filter_per_entry() {
        let filters = parse(
            &SingleColumnArrayValueParser,
            "age",
            json!({"gt": 18, "lt": 30, "in": "x"}),
        )
        .unwrap();

        assert_eq!(
            filters,
            vec![
                Filter::from(FilterWithOperator::new("age", 18, Operator::Gt)),
                Filter::from(FilterWithOperator::new("age", 30, Operator::Lt)),
                Filter::from(FilterIn::new("age", json!(["x"])).unwrap()),
            ]
        );
    }

    #[test]
    fn test_scalar_implicit_equals() {
        let filters = parse(&SingleColumnScalarParser, "name", json!("Jon")).unwrap();
        assert_eq!(
            filters,
            vec![Filter::from(FilterWithOperator::new("name", "Jon", Operator::Eq))]
        );
    }

    #[test]
    fn test_scalar_list_is_in() {
        let filters = parse(&SingleColumnScalarParser, "size", json!(["S", "M"])).unwrap();
        assert_eq!(
            filters,
            vec![Filter::from(FilterIn::new("size", json!(["S", "M"])).unwrap())]
        );
    }

    #[test]
    fn test_scalar_with_embedded_filter() {
        let filters = parse(&SingleColumnScalarParser, "age[gte]", json!(18)).unwrap();
        assert_eq!(
            filters,
            vec![Filter::from(FilterWithOperator::new("age", 18, Operator::Gte))]
        );
    }

    #[test]
    fn test_scalar_does_not_support_tuples() {
        assert!(!supports(&SingleColumnScalarParser, "name", json!("(a,b)")));
        assert!(!supports(&SingleColumnScalarParser, "(a,b)", json!("x")));
        assert!(supports(&SingleColumnScalarParser, "name", json!(null)));
    }
}
