//! Opaque filter value

use std::fmt;

use serde_json::Value as JsonValue;

use crate::domain::functions::FunctionHandle;
use crate::utils::format::format_for_error;

/// Immutable box around one raw datum or a function handle
///
/// Raw data are kept exactly as decoded (scalar, list or map); no coercion
/// happens here.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Raw(JsonValue),
    Function(FunctionHandle),
}

impl Value {
    pub fn new(value: impl Into<JsonValue>) -> Self {
        Self::Raw(value.into())
    }

    /// Get the raw datum, `None` for function handles
    pub fn as_raw(&self) -> Option<&JsonValue> {
        match self {
            Self::Raw(value) => Some(value),
            Self::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionHandle> {
        match self {
            Self::Function(handle) => Some(handle),
            Self::Raw(_) => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::Raw(JsonValue::Array(_)))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Raw(JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_))
        )
    }
}

/// Renders raw data like error messages quote them and handles as `callable`
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(value) => write!(f, "{}", format_for_error(value)),
            Self::Function(_) => write!(f, "callable"),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        Self::Raw(value)
    }
}

impl From<&JsonValue> for Value {
    fn from(value: &JsonValue) -> Self {
        Self::Raw(value.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Raw(JsonValue::String(value.to_string()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Raw(JsonValue::String(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Raw(JsonValue::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Raw(JsonValue::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Raw(JsonValue::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Raw(JsonValue::Bool(value))
    }
}

impl From<FunctionHandle> for Value {
    fn from(handle: FunctionHandle) -> Self {
        Self::Function(handle)
    }
}
