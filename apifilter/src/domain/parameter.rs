//! Function parameter definitions
//!
//! A [`Parameter`] describes how a declared function turns one of its
//! parameters into a filter: which filter kind, on which column, and whether a
//! default value replaces a live argument.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::core::constants::{FILTER_EQUALS, FUNCTION_TITLE};
use crate::domain::value::Value;
use crate::error::{FilterError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    filter: String,
    column: String,
    default_value: Option<Value>,
}

impl Parameter {
    /// Parameter compared with `eq` on a column of the same name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            filter: FILTER_EQUALS.to_string(),
            default_value: None,
        }
    }

    /// Parameter that always equals its default value
    pub fn equal_to_default_value(
        name: impl Into<String>,
        default_value: impl Into<Value>,
    ) -> Self {
        Self::new(name).with_default(default_value)
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn with_default(mut self, default_value: impl Into<Value>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Build a parameter from a descriptor
    pub fn from_spec(spec: ParameterSpec) -> Result<Self> {
        match spec {
            ParameterSpec::Name(name) => Ok(Self::new(name)),
            ParameterSpec::Definition {
                name,
                filter,
                column,
                default,
            } => Ok(Self::build(name, filter, column, default)),
            ParameterSpec::List(items) => Self::from_list(&items),
        }
    }

    /// `[name, filter?, column?, default?]`, `null` keeps the default for that slot
    fn from_list(items: &[JsonValue]) -> Result<Self> {
        if items.is_empty() || items.len() > 4 {
            return Err(FilterError::Declaration(format!(
                "Parameter definition must have 1 to 4 items, {} given.",
                items.len()
            )));
        }

        let name = items[0].as_str().ok_or_else(|| {
            FilterError::Declaration("Parameter name must be a string.".to_string())
        })?;
        let optional_string = |index: usize| -> Result<Option<String>> {
            match items.get(index) {
                None | Some(JsonValue::Null) => Ok(None),
                Some(JsonValue::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(FilterError::Declaration(format!(
                    "Parameter \"{}\" has an invalid definition item {}.",
                    name, other
                ))),
            }
        };
        let filter = optional_string(1)?;
        let column = optional_string(2)?;
        let default = items.get(3).filter(|value| !value.is_null()).cloned();

        Ok(Self::build(name.to_string(), filter, column, default))
    }

    fn build(
        name: String,
        filter: Option<String>,
        column: Option<String>,
        default: Option<JsonValue>,
    ) -> Self {
        let mut parameter = Self::new(name);
        if let Some(filter) = filter {
            parameter = parameter.with_filter(filter);
        }
        if let Some(column) = column {
            parameter = parameter.with_column(column);
        }
        if let Some(default) = default {
            parameter = parameter.with_default(default);
        }
        parameter
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }

    /// Placeholder title used when the default value is bound
    pub fn title_for_default_value(&self) -> String {
        format!("{}_{}", self.name, FUNCTION_TITLE)
    }
}

/// Descriptor accepted when declaring a function
///
/// Deserializes from a bare name, an array `[name, filter?, column?, default?]`
/// or an object `{ "name": .., "filter": .., "column": .., "default": .. }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterSpec {
    Name(String),
    List(Vec<JsonValue>),
    Definition {
        name: String,
        #[serde(default)]
        filter: Option<String>,
        #[serde(default)]
        column: Option<String>,
        #[serde(default)]
        default: Option<JsonValue>,
    },
}

impl From<&str> for ParameterSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ParameterSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Parameter> for ParameterSpec {
    fn from(parameter: Parameter) -> Self {
        Self::Definition {
            default: parameter
                .default_value
                .as_ref()
                .and_then(Value::as_raw)
                .cloned(),
            name: parameter.name,
            filter: Some(parameter.filter),
            column: Some(parameter.column),
        }
    }
}
