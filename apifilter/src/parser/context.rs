//! Per-pass parse state
//!
//! One [`ParseContext`] lives for exactly one `parse` call. It carries the
//! query parameters of that call, read access to the function registry and
//! the deduplication state shared by the function sub-parsers.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde_json::{Map, Value as JsonValue};
use tracing::trace;

use crate::core::constants::{FILTER_FUNCTION, FILTER_FUNCTION_PARAMETER};
use crate::domain::filter::{Filter, FilterFactory};
use crate::domain::functions::Functions;
use crate::domain::value::Value;
use crate::error::{FilterError, Result};

/// Decoded query parameters, in decoding order
pub type QueryParameters = Map<String, JsonValue>;

/// Syntax through which a function was recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionStrategy {
    ExplicitByList,
    ExplicitByName,
    ExplicitByTuple,
    ImplicitByTuple,
    ImplicitByValue,
}

impl fmt::Display for FunctionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitByList => write!(f, "explicit_by_list"),
            Self::ExplicitByName => write!(f, "explicit_by_name"),
            Self::ExplicitByTuple => write!(f, "explicit_by_tuple"),
            Self::ImplicitByTuple => write!(f, "implicit_by_tuple"),
            Self::ImplicitByValue => write!(f, "implicit_by_value"),
        }
    }
}

/// Functions fired, parameters emitted and columns consumed so far in one pass
///
/// A parameter is emitted once, whichever syntax supplied its value. A column
/// is consumed only when a function read that column's own value; consumed
/// columns never reach the ordinary filter strategies.
#[derive(Debug, Default)]
pub struct ParseState {
    functions: HashMap<String, FunctionStrategy>,
    parameters: HashSet<String>,
    consumed: HashSet<String>,
}

impl ParseState {
    /// Strategy that fired a function, if it fired already
    pub fn fired_by(&self, function: &str) -> Option<FunctionStrategy> {
        self.functions.get(function).copied()
    }

    pub fn is_parameter_emitted(&self, parameter: &str) -> bool {
        self.parameters.contains(parameter)
    }

    pub fn is_column_consumed(&self, column: &str) -> bool {
        self.consumed.contains(column)
    }
}

pub struct ParseContext<'a> {
    query: Option<&'a QueryParameters>,
    functions: &'a Functions,
    factory: FilterFactory,
    function_column: &'a str,
    state: ParseState,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        query: &'a QueryParameters,
        functions: &'a Functions,
        factory: FilterFactory,
        function_column: &'a str,
    ) -> Self {
        Self {
            query: Some(query),
            functions,
            factory,
            function_column,
            state: ParseState::default(),
        }
    }

    /// Context without query parameters, function recognition fails on it
    pub fn detached(
        functions: &'a Functions,
        factory: FilterFactory,
        function_column: &'a str,
    ) -> Self {
        Self {
            query: None,
            functions,
            factory,
            function_column,
            state: ParseState::default(),
        }
    }

    pub fn query_parameters(&self) -> Result<&'a QueryParameters> {
        self.query.ok_or_else(|| {
            FilterError::Invocation("Query parameters must be set to FunctionParser.".to_string())
        })
    }

    pub fn functions(&self) -> &'a Functions {
        self.functions
    }

    pub fn factory(&self) -> FilterFactory {
        self.factory
    }

    /// Reserved column naming functions explicitly
    pub fn function_column(&self) -> &'a str {
        self.function_column
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    pub fn create_filter(
        &self,
        column: &str,
        filter: &str,
        value: impl Into<Value>,
    ) -> Result<Filter> {
        self.factory.create(column, filter, value)
    }

    /// Emit the function filter, failing when the function already fired
    pub fn fire_function(&mut self, function: &str, strategy: FunctionStrategy) -> Result<Filter> {
        if self.state.functions.contains_key(function) {
            return Err(FilterError::MultipleFunctionCall);
        }
        let handle = self.functions.handle(function)?.clone();
        self.state.functions.insert(function.to_string(), strategy);

        trace!(function = %function, strategy = %strategy, "Function recognized");
        self.factory.create(function, FILTER_FUNCTION, handle)
    }

    /// Emit a function parameter unless it was already emitted
    pub fn function_parameter(
        &mut self,
        parameter: &str,
        value: JsonValue,
    ) -> Result<Option<Filter>> {
        if !self.state.parameters.insert(parameter.to_string()) {
            return Ok(None);
        }
        self.factory
            .create(parameter, FILTER_FUNCTION_PARAMETER, value)
            .map(Some)
    }

    /// Mark a top-level column whose value a function read
    pub fn consume_column(&mut self, column: &str) {
        self.state.consumed.insert(column.to_string());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::filter::FunctionParameter;
    use crate::domain::filterable::Filterable;
    use crate::domain::functions::FunctionHandle;
    use crate::error::ErrorKind;

    fn functions() -> Functions {
        let mut functions = Functions::new();
        functions
            .register(
                "fullName",
                vec!["firstName".to_string(), "surname".to_string()],
                FunctionHandle::new("fullName", |_, filterable: &Filterable, _| {
                    Ok(filterable.clone())
                }),
                vec![],
            )
            .unwrap();
        functions
    }

    #[test]
    fn test_function_fires_once() {
        let functions = functions();
        let query = QueryParameters::new();
        let mut context = ParseContext::new(&query, &functions, FilterFactory::new(), "fun");

        let filter = context
            .fire_function("fullName", FunctionStrategy::ExplicitByName)
            .unwrap();
        assert_eq!(filter.column(), "fullName");
        assert_eq!(
            context.state().fired_by("fullName"),
            Some(FunctionStrategy::ExplicitByName)
        );

        let err = context
            .fire_function("fullName", FunctionStrategy::ImplicitByValue)
            .unwrap_err();
        assert_eq!(err, FilterError::MultipleFunctionCall);
    }

    #[test]
    fn test_parameter_emitted_once() {
        let functions = functions();
        let query = QueryParameters::new();
        let mut context = ParseContext::new(&query, &functions, FilterFactory::new(), "fun");

        let first = context
            .function_parameter("firstName", json!("Jon"))
            .unwrap();
        let expected = Filter::from(FunctionParameter::new("firstName", "Jon"));
        assert_eq!(first, Some(expected));
        assert!(context.state().is_parameter_emitted("firstName"));
        assert!(!context.state().is_column_consumed("firstName"));

        let second = context
            .function_parameter("firstName", json!("Arya"))
            .unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn test_consumed_columns() {
        let functions = functions();
        let query = QueryParameters::new();
        let mut context = ParseContext::new(&query, &functions, FilterFactory::new(), "fun");

        context.consume_column("surname");
        assert!(context.state().is_column_consumed("surname"));
        assert!(!context.state().is_parameter_emitted("surname"));
    }

    #[test]
    fn test_detached_context_has_no_query_parameters() {
        let functions = functions();
        let context = ParseContext::detached(&functions, FilterFactory::new(), "fun");

        let err = context.query_parameters().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Query parameters must be set to FunctionParser."
        );
        assert_eq!(err.kind(), ErrorKind::FunctionInvocation);
    }
}
