//! Filter type definitions
//!
//! A [`Filter`] is a closed set of variants. Every variant exposes a column,
//! a title and a [`Value`]; the placeholder used to bind the value in a backend
//! is `column_title` unless a full title overrides it.

use std::fmt;

use serde_json::Value as JsonValue;

use crate::core::constants::{
    FILTER_EQUALS, FILTER_GREATER_THAN, FILTER_GREATER_THAN_OR_EQUAL, FILTER_IN,
    FILTER_LESS_THAN, FILTER_LESS_THAN_OR_EQUAL, FUNCTION_TITLE,
};
use crate::domain::functions::FunctionHandle;
use crate::domain::value::Value;
use crate::error::{FilterError, Result};

/// Comparison operators of single-value filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Operator {
    /// Comparison symbol used by backends
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }

    /// Filter-kind token, also the filter title
    pub fn title(&self) -> &'static str {
        match self {
            Operator::Eq => FILTER_EQUALS,
            Operator::Gt => FILTER_GREATER_THAN,
            Operator::Lt => FILTER_LESS_THAN,
            Operator::Gte => FILTER_GREATER_THAN_OR_EQUAL,
            Operator::Lte => FILTER_LESS_THAN_OR_EQUAL,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Discriminant of [`Filter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    WithOperator,
    In,
    Function,
    FunctionParameter,
}

fn placeholder(column: &str, title: &str, full_title: &Option<String>) -> String {
    match full_title {
        Some(full_title) => full_title.clone(),
        None => format!("{}_{}", column, title),
    }
}

// ============================================================================
// Variants
// ============================================================================

/// Single-value comparison (`=`, `>`, `<`, `>=`, `<=`)
#[derive(Debug, Clone, PartialEq)]
pub struct FilterWithOperator {
    column: String,
    value: Value,
    operator: Operator,
    full_title: Option<String>,
}

impl FilterWithOperator {
    pub fn new(column: impl Into<String>, value: impl Into<Value>, operator: Operator) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            operator,
            full_title: None,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn title(&self) -> &str {
        self.operator.title()
    }

    pub fn placeholder(&self) -> String {
        placeholder(&self.column, self.title(), &self.full_title)
    }
}

/// Membership test, the value is always a list
#[derive(Debug, Clone, PartialEq)]
pub struct FilterIn {
    column: String,
    value: Value,
    full_title: Option<String>,
}

impl FilterIn {
    /// Create an IN filter, wrapping a scalar into a one-element list
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let items = match value.into() {
            Value::Raw(JsonValue::Array(items)) => items,
            Value::Raw(
                scalar @ (JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_)),
            ) => vec![scalar],
            other => {
                return Err(FilterError::InvalidValue(format!(
                    "Value for IN filter must be array or scalar. \"{}\" given.",
                    other
                )));
            }
        };

        Ok(Self {
            column: column.into(),
            value: Value::Raw(JsonValue::Array(items)),
            full_title: None,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Items of the list value
    pub fn items(&self) -> &[JsonValue] {
        match &self.value {
            Value::Raw(JsonValue::Array(items)) => items,
            _ => &[],
        }
    }

    pub fn title(&self) -> &str {
        FILTER_IN
    }

    pub fn operator(&self) -> &'static str {
        FILTER_IN
    }

    pub fn placeholder(&self) -> String {
        placeholder(&self.column, self.title(), &self.full_title)
    }

    /// Placeholder of the item at `index`
    pub fn item_placeholder(&self, index: usize) -> String {
        format!("{}_{}", self.placeholder(), index)
    }
}

/// A registered function firing; the column holds the function name
#[derive(Debug, Clone, PartialEq)]
pub struct FilterFunction {
    column: String,
    value: Value,
    handle: FunctionHandle,
}

impl FilterFunction {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        let handle = value.as_function().cloned().ok_or_else(|| {
            FilterError::InvalidValue(format!(
                "Value for filter function must be callable. \"{}\" given.",
                value
            ))
        })?;

        Ok(Self {
            column: column.into(),
            value,
            handle,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn handle(&self) -> &FunctionHandle {
        &self.handle
    }

    pub fn title(&self) -> &str {
        FUNCTION_TITLE
    }

    pub fn placeholder(&self) -> String {
        placeholder(&self.column, self.title(), &None)
    }
}

/// Raw value of one function parameter; the column holds the parameter name
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParameter {
    column: String,
    value: Value,
}

impl FunctionParameter {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn title(&self) -> &str {
        FUNCTION_TITLE
    }

    pub fn placeholder(&self) -> String {
        placeholder(&self.column, self.title(), &None)
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Structured predicate extracted from one raw query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    WithOperator(FilterWithOperator),
    In(FilterIn),
    Function(FilterFunction),
    FunctionParameter(FunctionParameter),
}

impl Filter {
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::WithOperator(_) => FilterKind::WithOperator,
            Self::In(_) => FilterKind::In,
            Self::Function(_) => FilterKind::Function,
            Self::FunctionParameter(_) => FilterKind::FunctionParameter,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Self::WithOperator(f) => f.column(),
            Self::In(f) => f.column(),
            Self::Function(f) => f.column(),
            Self::FunctionParameter(f) => f.column(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::WithOperator(f) => f.title(),
            Self::In(f) => f.title(),
            Self::Function(f) => f.title(),
            Self::FunctionParameter(f) => f.title(),
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::WithOperator(f) => f.value(),
            Self::In(f) => f.value(),
            Self::Function(f) => f.value(),
            Self::FunctionParameter(f) => f.value(),
        }
    }

    /// Key the value is bound to in a backend
    pub fn placeholder(&self) -> String {
        match self {
            Self::WithOperator(f) => f.placeholder(),
            Self::In(f) => f.placeholder(),
            Self::Function(f) => f.placeholder(),
            Self::FunctionParameter(f) => f.placeholder(),
        }
    }

    /// Replace the whole placeholder of a value filter
    ///
    /// Used for parameters that carry a declared default. Function and
    /// function parameter filters keep their placeholder.
    pub fn set_full_title(&mut self, full_title: impl Into<String>) {
        match self {
            Self::WithOperator(f) => f.full_title = Some(full_title.into()),
            Self::In(f) => f.full_title = Some(full_title.into()),
            Self::Function(_) | Self::FunctionParameter(_) => {}
        }
    }
}

impl From<FilterWithOperator> for Filter {
    fn from(filter: FilterWithOperator) -> Self {
        Self::WithOperator(filter)
    }
}

impl From<FilterIn> for Filter {
    fn from(filter: FilterIn) -> Self {
        Self::In(filter)
    }
}

impl From<FilterFunction> for Filter {
    fn from(filter: FilterFunction) -> Self {
        Self::Function(filter)
    }
}

impl From<FunctionParameter> for Filter {
    fn from(filter: FunctionParameter) -> Self {
        Self::FunctionParameter(filter)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::filterable::Filterable;

    #[test]
    fn test_operator_symbols_and_titles() {
        let operators = [
            (Operator::Eq, "=", "eq"),
            (Operator::Gt, ">", "gt"),
            (Operator::Lt, "<", "lt"),
            (Operator::Gte, ">=", "gte"),
            (Operator::Lte, "<=", "lte"),
        ];

        for (operator, symbol, title) in operators {
            assert_eq!(operator.symbol(), symbol);
            assert_eq!(operator.title(), title);
        }
    }

    #[test]
    fn test_filter_with_operator_placeholder() {
        let filter = Filter::from(FilterWithOperator::new("age", 18, Operator::Gt));
        assert_eq!(filter.kind(), FilterKind::WithOperator);
        assert_eq!(filter.column(), "age");
        assert_eq!(filter.title(), "gt");
        assert_eq!(filter.placeholder(), "age_gt");
    }

    #[test]
    fn test_filter_in_wraps_scalar() {
        let filter = FilterIn::new("size", "S").unwrap();
        assert_eq!(filter.value(), &Value::new(json!(["S"])));
        assert_eq!(filter.items(), &[json!("S")]);
        assert_eq!(filter.item_placeholder(1), "size_in_1");
    }

    #[test]
    fn test_filter_in_keeps_list() {
        let filter = FilterIn::new("size", json!(["S", "M"])).unwrap();
        assert_eq!(filter.items().len(), 2);
    }

    #[test]
    fn test_filter_in_rejects_map() {
        let err = FilterIn::new("size", json!({"a": 1})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Value for IN filter must be array or scalar. \"[a => 1]\" given."
        );
    }

    #[test]
    fn test_filter_function_requires_callable() {
        let err = FilterFunction::new("fullName", "not callable").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Value for filter function must be callable. \"not callable\" given."
        );

        let handle = FunctionHandle::new("fullName", |_, filterable: &Filterable, _| {
            Ok(filterable.clone())
        });
        let filter = FilterFunction::new("fullName", handle).unwrap();
        assert_eq!(filter.handle().name(), "fullName");
        assert_eq!(filter.title(), "fun");
    }

    #[test]
    fn test_function_parameter_placeholder_is_fixed() {
        let parameter = FunctionParameter::new("gender", "female");
        assert_eq!(parameter.title(), "fun");
        assert_eq!(parameter.placeholder(), "gender_fun");

        let mut filter = Filter::from(parameter);
        filter.set_full_title("other_fun");
        assert_eq!(filter.placeholder(), "gender_fun");
    }

    #[test]
    fn test_full_title_replaces_placeholder() {
        let mut filter = Filter::from(FilterWithOperator::new("gender", "female", Operator::Eq));
        filter.set_full_title("gender_fun");
        assert_eq!(filter.placeholder(), "gender_fun");
    }
}
