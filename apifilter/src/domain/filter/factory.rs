//! Filter construction from filter-kind tokens

use crate::core::constants::{
    FILTER_EQUALS, FILTER_FUNCTION, FILTER_FUNCTION_PARAMETER, FILTER_GREATER_THAN,
    FILTER_GREATER_THAN_OR_EQUAL, FILTER_IN, FILTER_LESS_THAN, FILTER_LESS_THAN_OR_EQUAL,
};
use crate::domain::value::Value;
use crate::error::{FilterError, Result};

use super::types::{
    Filter, FilterFunction, FilterIn, FilterWithOperator, FunctionParameter, Operator,
};

/// Maps a filter-kind token and a value to the matching [`Filter`] variant
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterFactory;

impl FilterFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create a filter; the token is matched case-insensitively
    pub fn create(&self, column: &str, filter: &str, value: impl Into<Value>) -> Result<Filter> {
        let value = value.into();

        let created = match filter.to_lowercase().as_str() {
            FILTER_EQUALS => FilterWithOperator::new(column, value, Operator::Eq).into(),
            FILTER_GREATER_THAN => FilterWithOperator::new(column, value, Operator::Gt).into(),
            FILTER_LESS_THAN => FilterWithOperator::new(column, value, Operator::Lt).into(),
            FILTER_GREATER_THAN_OR_EQUAL => {
                FilterWithOperator::new(column, value, Operator::Gte).into()
            }
            FILTER_LESS_THAN_OR_EQUAL => {
                FilterWithOperator::new(column, value, Operator::Lte).into()
            }
            FILTER_IN => FilterIn::new(column, value)?.into(),
            FILTER_FUNCTION => FilterFunction::new(column, value)?.into(),
            FILTER_FUNCTION_PARAMETER => FunctionParameter::new(column, value).into(),
            _ => {
                return Err(FilterError::UnknownFilter {
                    filter: filter.to_string(),
                    column: column.to_string(),
                    value: value.to_string(),
                });
            }
        };

        Ok(created)
    }
}
