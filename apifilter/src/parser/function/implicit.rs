//! Implicit function recognition

use serde_json::Value as JsonValue;

use crate::domain::filter::Filter;
use crate::error::{FilterError, Result};
use crate::parser::Parser;
use crate::parser::context::{FunctionStrategy, ParseContext, QueryParameters};
use crate::parser::tuple::{Tuple, is_tuple_str};

use super::explicit::tuple_value;
use super::listed_functions;

/// Tuple column holding exactly the parameter set of one function, in any
/// order
pub struct ImplicitByTupleParser;

impl Parser for ImplicitByTupleParser {
    fn name(&self) -> &'static str {
        "implicit_by_tuple"
    }

    fn supports(
        &self,
        context: &ParseContext<'_>,
        column: &str,
        _value: &JsonValue,
    ) -> Result<bool> {
        context.query_parameters()?;
        if !is_tuple_str(column) {
            return Ok(false);
        }
        let columns = Tuple::parse(column)?.columns();
        let functions = context.functions();
        let owners = functions.function_names_by_all_parameters(&columns);
        Ok(!owners.is_empty())
    }

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        let raw_value = tuple_value(value)?;
        let columns = Tuple::parse(column)?.columns();
        let values = Tuple::parse_with_count(raw_value, columns.len())?.values()?;

        let functions = context.functions();
        let mut filters = Vec::new();
        for name in functions.function_names_by_all_parameters(&columns) {
            filters.push(context.fire_function(name, FunctionStrategy::ImplicitByTuple)?);
        }
        for (parameter, value) in columns.iter().zip(values) {
            filters.extend(context.function_parameter(parameter, value)?);
        }

        Ok(filters)
    }
}

/// Bare parameter column of a function whose parameters are all present
///
/// Functions listed in the reserved column are left to the explicit list
/// strategy.
pub struct ImplicitByValueParser;

impl ImplicitByValueParser {
    /// Functions owning `column` that have every parameter in the query
    fn complete_functions<'a>(
        context: &ParseContext<'a>,
        query: &QueryParameters,
        column: &str,
    ) -> Vec<&'a str> {
        let functions = context.functions();
        let listed = listed_functions(query, context.function_column());

        functions
            .function_names_by_parameter(column)
            .into_iter()
            .filter(|name| !listed.iter().any(|listed| listed == name))
            .filter(|name| {
                functions
                    .parameters_for(name)
                    .is_ok_and(|parameters| parameters.iter().all(|p| query.contains_key(p)))
            })
            .collect()
    }
}

impl Parser for ImplicitByValueParser {
    fn name(&self) -> &'static str {
        "implicit_by_value"
    }

    fn supports(
        &self,
        context: &ParseContext<'_>,
        column: &str,
        _value: &JsonValue,
    ) -> Result<bool> {
        let query = context.query_parameters()?;
        if is_tuple_str(column) {
            return Ok(false);
        }
        Ok(!Self::complete_functions(context, query, column).is_empty())
    }

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        column: &str,
        _value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        let query = context.query_parameters()?;
        let name = match Self::complete_functions(context, query, column).as_slice() {
            [] => return Ok(Vec::new()),
            [name] => *name,
            names => {
                return Err(FilterError::AmbiguousFunction(
                    names.iter().map(|name| name.to_string()).collect(),
                ));
            }
        };

        match context.state().fired_by(name) {
            Some(FunctionStrategy::ImplicitByValue) => return Ok(Vec::new()),
            Some(_) => return Err(FilterError::MultipleFunctionCall),
            None => {}
        }

        let function = context.fire_function(name, FunctionStrategy::ImplicitByValue)?;
        let mut filters = vec![function];
        for parameter in context.functions().parameters_for(name)? {
            if let Some(value) = query.get(parameter) {
                context.consume_column(parameter);
                filters.extend(context.function_parameter(parameter, value.clone())?);
            }
        }

        Ok(filters)
    }
}
