//! Explicit function recognition

use serde_json::Value as JsonValue;

use crate::domain::filter::Filter;
use crate::error::{FilterError, Result};
use crate::parser::Parser;
use crate::parser::context::{FunctionStrategy, ParseContext};
use crate::parser::tuple::{Tuple, is_tuple, is_tuple_str};
use crate::utils::format::format_for_error;

use super::{listed_functions, token_to_name};

/// Functions listed in the reserved column, parameters taken from sibling
/// columns
///
/// Triggered by the reserved column itself or by a parameter column of a
/// listed function that comes before it.
pub struct ExplicitByListParser;

impl Parser for ExplicitByListParser {
    fn name(&self) -> &'static str {
        "explicit_by_list"
    }

    fn supports(
        &self,
        context: &ParseContext<'_>,
        column: &str,
        _value: &JsonValue,
    ) -> Result<bool> {
        let query = context.query_parameters()?;
        let function_column = context.function_column();
        if column == function_column {
            return Ok(true);
        }
        if context.state().is_column_consumed(function_column) {
            return Ok(false);
        }

        let functions = context.functions();
        let owned_by_listed = listed_functions(query, function_column)
            .into_iter()
            .filter_map(|name| functions.parameters_for(name).ok())
            .any(|parameters| parameters.iter().any(|p| p == column));
        Ok(owned_by_listed)
    }

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        _column: &str,
        _value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        let query = context.query_parameters()?;
        let function_column = context.function_column();
        if context.state().is_column_consumed(function_column) {
            return Ok(Vec::new());
        }
        context.consume_column(function_column);

        let raw_names = query.get(function_column).unwrap_or(&JsonValue::Null);
        let not_a_list = || {
            FilterError::Declaration(format!(
                "Explicit function definition by values must be an array of functions. {} given.",
                format_for_error(raw_names)
            ))
        };
        let names = raw_names
            .as_array()
            .ok_or_else(not_a_list)?
            .iter()
            .map(|name| name.as_str().ok_or_else(not_a_list))
            .collect::<Result<Vec<_>>>()?;

        let functions = context.functions();
        let mut filters = Vec::new();
        for name in names {
            filters.push(context.fire_function(name, FunctionStrategy::ExplicitByList)?);

            for parameter in functions.parameters_for(name)? {
                let value = query
                    .get(parameter)
                    .ok_or_else(|| FilterError::missing_parameter(parameter, name))?;
                context.consume_column(parameter);
                filters.extend(context.function_parameter(parameter, value.clone())?);
            }
        }

        Ok(filters)
    }
}

/// Column naming a registered function, value holding its parameters
pub struct ExplicitByNameParser;

impl Parser for ExplicitByNameParser {
    fn name(&self) -> &'static str {
        "explicit_by_name"
    }

    fn supports(
        &self,
        context: &ParseContext<'_>,
        column: &str,
        _value: &JsonValue,
    ) -> Result<bool> {
        context.query_parameters()?;
        Ok(!is_tuple_str(column) && context.functions().is_registered(column))
    }

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        let parameters = context.functions().parameters_for(column)?;
        let function = context.fire_function(column, FunctionStrategy::ExplicitByName)?;
        let mut filters = vec![function];

        if let [parameter] = parameters {
            if is_tuple(value) || value.is_array() || value.is_object() {
                return Err(FilterError::Declaration(
                    "A single parameter function definition must have a single value.".to_string(),
                ));
            }
            filters.extend(context.function_parameter(parameter, value.clone())?);
            return Ok(filters);
        }

        let Some(raw_value) = tuple_str(value) else {
            return Err(FilterError::Declaration(
                "Direct function definition must have a tuple value.".to_string(),
            ));
        };
        let values = Tuple::parse_with_count(raw_value, parameters.len())?.values()?;
        for (parameter, value) in parameters.iter().zip(values) {
            filters.extend(context.function_parameter(parameter, value)?);
        }

        Ok(filters)
    }
}

/// Tuple column starting with the reserved column, value starting with the
/// function name
///
/// The value may also be a list of such tuples. Column tokens after the
/// reserved column are labels only, and value tokens beyond the function's
/// parameters are ignored.
pub struct ExplicitByTupleParser;

impl ExplicitByTupleParser {
    fn parse_tuple(
        context: &mut ParseContext<'_>,
        columns: usize,
        value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        let raw_value = tuple_value(value)?;
        let mut values = Tuple::parse_with_count(raw_value, columns)?
            .values()?
            .into_iter();
        let name = values
            .next()
            .map(|token| token_to_name(&token))
            .unwrap_or_default();

        let functions = context.functions();
        let function = context.fire_function(&name, FunctionStrategy::ExplicitByTuple)?;
        let mut filters = vec![function];
        for parameter in functions.parameters_for(&name)? {
            let value = values
                .next()
                .ok_or_else(|| FilterError::missing_parameter(parameter, &name))?;
            filters.extend(context.function_parameter(parameter, value)?);
        }

        Ok(filters)
    }
}

impl Parser for ExplicitByTupleParser {
    fn name(&self) -> &'static str {
        "explicit_by_tuple"
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
        let first = Tuple::parse(column)?.first_column();
        Ok(first.as_deref() == Some(context.function_column()))
    }

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        let columns = Tuple::parse(column)?.len();

        match value {
            JsonValue::Array(tuples) => {
                let mut filters = Vec::new();
                for tuple in tuples {
                    filters.extend(Self::parse_tuple(context, columns, tuple)?);
                }
                Ok(filters)
            }
            _ => Self::parse_tuple(context, columns, value),
        }
    }
}

fn tuple_str(value: &JsonValue) -> Option<&str> {
    value.as_str().filter(|raw| is_tuple_str(raw))
}

/// Raw tuple string of a value, required by tuple based definitions
pub(super) fn tuple_value(value: &JsonValue) -> Result<&str> {
    tuple_str(value).ok_or_else(|| {
        FilterError::Declaration(
            "Function definition by a tuple must have a tuple value.".to_string(),
        )
    })
}
