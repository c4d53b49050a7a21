//! Query parameter parsing
//!
//! Turns decoded query parameters into an ordered [`Filters`] collection.
//! Every (column, value) pair goes through a priority-ordered chain of
//! strategies; the first strategy supporting the pair parses it:
//!
//! | Priority | Strategy                       | Shape                         |
//! |----------|--------------------------------|-------------------------------|
//! | highest  | [`FunctionParser`]             | any function invocation       |
//! | higher   | [`TupleColumnTupleValueParser`]| `(a,b)=(1,2)`                 |
//! | high     | [`TupleColumnArrayValueParser`]| `(a,b)[gt]=(1,2)`             |
//! | medium   | [`UnsupportedTupleCombinationParser`] | tuple on one side only |
//! | low      | [`SingleColumnArrayValueParser`]| `a[gt]=1`                    |
//! | lowest   | [`SingleColumnScalarParser`]   | `a=1`                         |

pub mod context;
pub mod function;
pub mod single;
pub mod tuple;
pub mod tuples;

use serde_json::Value as JsonValue;
use tracing::trace;

use crate::core::constants::{
    DEFAULT_FUNCTION_COLUMN, PRIORITY_HIGH, PRIORITY_HIGHER, PRIORITY_HIGHEST, PRIORITY_LOW,
    PRIORITY_LOWEST, PRIORITY_MEDIUM,
};
use crate::domain::filter::{Filter, FilterFactory};
use crate::domain::filters::Filters;
use crate::domain::functions::Functions;
use crate::error::Result;
use crate::utils::prioritized::Prioritized;

pub use context::{FunctionStrategy, ParseContext, ParseState, QueryParameters};
pub use function::FunctionParser;
pub use single::{SingleColumnArrayValueParser, SingleColumnScalarParser};
pub use tuple::Tuple;
pub use tuples::{
    TupleColumnArrayValueParser, TupleColumnTupleValueParser, UnsupportedTupleCombinationParser,
};

/// One parsing strategy
///
/// Strategies hold no per-pass state; everything a pass accumulates lives in
/// the [`ParseContext`].
pub trait Parser: Send + Sync {
    /// Strategy name for logs
    fn name(&self) -> &'static str;

    fn supports(&self, context: &ParseContext<'_>, column: &str, value: &JsonValue) -> Result<bool>;

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Vec<Filter>>;
}

/// Strategy chain over a whole query parameter map
pub struct QueryParametersParser {
    parsers: Prioritized<Box<dyn Parser>>,
    factory: FilterFactory,
    function_column: String,
}

impl Default for QueryParametersParser {
    fn default() -> Self {
        Self::new(FilterFactory::new(), DEFAULT_FUNCTION_COLUMN)
    }
}

impl QueryParametersParser {
    pub fn new(factory: FilterFactory, function_column: impl Into<String>) -> Self {
        let mut parsers: Prioritized<Box<dyn Parser>> = Prioritized::new();
        parsers.add(Box::new(FunctionParser::new()), PRIORITY_HIGHEST);
        parsers.add(Box::new(TupleColumnTupleValueParser), PRIORITY_HIGHER);
        parsers.add(Box::new(TupleColumnArrayValueParser), PRIORITY_HIGH);
        parsers.add(Box::new(UnsupportedTupleCombinationParser), PRIORITY_MEDIUM);
        parsers.add(Box::new(SingleColumnArrayValueParser), PRIORITY_LOW);
        parsers.add(Box::new(SingleColumnScalarParser), PRIORITY_LOWEST);

        Self {
            parsers,
            factory,
            function_column: function_column.into(),
        }
    }

    pub fn function_column(&self) -> &str {
        &self.function_column
    }

    /// Parse all query parameters in one pass
    pub fn parse(&self, query: &QueryParameters, functions: &Functions) -> Result<Filters> {
        let mut context = ParseContext::new(query, functions, self.factory, &self.function_column);
        let mut filters = Filters::new();

        for (column, value) in query {
            for parser in self.parsers.iter() {
                if parser.supports(&context, column, value)? {
                    trace!(column = %column, parser = parser.name(), "Parsing query parameter");
                    filters.extend(parser.parse(&mut context, column, value)?);
                    break;
                }
            }
        }

        Ok(filters)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::filter::{FilterIn, FilterWithOperator, Operator};
    use crate::error::{ErrorKind, FilterError};

    fn parse(query: JsonValue) -> Result<Filters> {
        let query = query.as_object().cloned().unwrap_or_default();
        QueryParametersParser::default().parse(&query, &Functions::new())
    }

    #[test]
    fn test_scalar_is_implicit_equals() {
        let filters = parse(json!({"name": "Jon"})).unwrap();
        assert_eq!(
            filters,
            Filters::from(vec![FilterWithOperator::new("name", "Jon", Operator::Eq).into()])
        );
    }

    #[test]
    fn test_keeps_query_order() {
        let filters = parse(json!({
            "age": {"gt": 18, "lt": 30},
            "size": {"in": ["S", "M"]},
            "name": "Jon",
        }))
        .unwrap();

        assert_eq!(
            filters,
            Filters::from(vec![
                FilterWithOperator::new("age", 18, Operator::Gt).into(),
                FilterWithOperator::new("age", 30, Operator::Lt).into(),
                FilterIn::new("size", json!(["S", "M"])).unwrap().into(),
                FilterWithOperator::new("name", "Jon", Operator::Eq).into(),
            ])
        );
    }

    #[test]
    fn test_in_normalization() {
        let scalar = parse(json!({"c": {"in": "x"}})).unwrap();
        let list = parse(json!({"c": {"in": ["x"]}})).unwrap();
        assert_eq!(scalar, list);
        assert_eq!(
            scalar,
            Filters::from(vec![FilterIn::new("c", json!(["x"])).unwrap().into()])
        );
    }

    #[test]
    fn test_tuple_arity_mismatch() {
        let err = parse(json!({"(col1,col2,col3)": "(v1,v2)"})).unwrap_err();
        assert_eq!(err, FilterError::tuple_count(3, 2));
    }

    #[test]
    fn test_empty_tuple_is_rejected() {
        for query in [
            json!({"()": "()"}),
            json!({"(a)": "()"}),
            json!({"()": {"gt": 1}}),
        ] {
            let err = parse(query).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Grammar);
        }
    }

    #[test]
    fn test_tuple_with_scalar_column() {
        let err = parse(json!({"name": "(Jon, Snow)"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid combination of a tuple and a scalar. Column name and value (Jon, Snow)."
        );
    }

    #[test]
    fn test_unknown_filter() {
        let err = parse(json!({"name": {"like": "Jo%"}})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Filter \"like\" is not implemented. For column \"name\" with value \"Jo%\"."
        );
    }

    #[test]
    fn test_reserved_column_without_functions() {
        let err = parse(json!({"fun": ["missing"]})).unwrap_err();
        assert_eq!(err.to_string(), "Function \"missing\" is not registered.");
    }
}
