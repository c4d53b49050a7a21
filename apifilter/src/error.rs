//! Error types
//!
//! Every failure raised while parsing query parameters, resolving functions or
//! applying filters is a [`FilterError`]. The [`ApiFilter`](crate::api::ApiFilter)
//! façade converts it into the single public [`ApiFilterError`], which keeps the
//! original error as its source.

use std::fmt;

use thiserror::Error;

/// Category of a failure, stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Tuple/list micro-grammar misuse
    Grammar,
    /// Filter-kind token not known to the factory
    UnknownFilter,
    /// Value not acceptable for the requested filter variant
    InvalidValue,
    /// Function registration or recognition problem
    FunctionDeclaration,
    /// Function resolved or executed incorrectly
    FunctionInvocation,
    /// No backend can handle the filterable
    BackendDispatch,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Grammar => write!(f, "grammar"),
            ErrorKind::UnknownFilter => write!(f, "unknown_filter"),
            ErrorKind::InvalidValue => write!(f, "invalid_value"),
            ErrorKind::FunctionDeclaration => write!(f, "function_declaration"),
            ErrorKind::FunctionInvocation => write!(f, "function_invocation"),
            ErrorKind::BackendDispatch => write!(f, "backend_dispatch"),
        }
    }
}

/// Internal error type for the parser, registries and backends
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Number of given columns ({columns}) and values ({values}) in tuple are not same.")]
    TupleCount { columns: usize, values: usize },

    #[error("Invalid combination of a tuple and a scalar. Column {column} and value {value}.")]
    InvalidTupleCombination { column: String, value: String },

    #[error("Filters can be specified either in columns or in values - not in both")]
    FilterInColumnsAndValues,

    #[error("Tuples are not allowed in IN filter.")]
    TupleInInFilter,

    /// Tuple text that cannot be tokenized
    #[error("Invalid tuple {tuple}: {reason}.")]
    MalformedTuple { tuple: String, reason: String },

    #[error("Filter \"{filter}\" is not implemented. For column \"{column}\" with value \"{value}\".")]
    UnknownFilter {
        filter: String,
        column: String,
        value: String,
    },

    #[error("{0}")]
    InvalidValue(String),

    #[error("{0}")]
    Declaration(String),

    #[error("It is not allowed to call one function multiple times.")]
    MultipleFunctionCall,

    #[error("There is not enough information to decide which function to use: {}.", .0.join(", "))]
    AmbiguousFunction(Vec<String>),

    #[error("{0}")]
    Invocation(String),

    #[error("Unsupported filterable of type \"{type_name}\".")]
    UnsupportedFilterable { type_name: String },

    /// Backend-specific failure while applying a filter
    #[error("Applicator {applicator} failed: {reason}")]
    Backend {
        applicator: &'static str,
        reason: String,
    },
}

impl FilterError {
    /// Create a tuple arity mismatch error
    pub fn tuple_count(columns: usize, values: usize) -> Self {
        Self::TupleCount { columns, values }
    }

    /// Create a malformed tuple error
    pub fn malformed_tuple(tuple: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTuple {
            tuple: tuple.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an error for a function that is not registered
    pub fn function_not_registered(function: &str) -> Self {
        Self::Declaration(format!("Function \"{}\" is not registered.", function))
    }

    /// Create an error for a parameter missing from an explicit invocation
    pub fn missing_parameter(parameter: &str, function: &str) -> Self {
        Self::Declaration(format!(
            "There is a missing parameter {} for a function {}.",
            parameter, function
        ))
    }

    /// Create a backend failure
    pub fn backend(applicator: &'static str, reason: impl Into<String>) -> Self {
        Self::Backend {
            applicator,
            reason: reason.into(),
        }
    }

    /// Get the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TupleCount { .. }
            | Self::InvalidTupleCombination { .. }
            | Self::FilterInColumnsAndValues
            | Self::TupleInInFilter
            | Self::MalformedTuple { .. } => ErrorKind::Grammar,
            Self::UnknownFilter { .. } => ErrorKind::UnknownFilter,
            Self::InvalidValue(_) => ErrorKind::InvalidValue,
            Self::Declaration(_) => ErrorKind::FunctionDeclaration,
            Self::MultipleFunctionCall | Self::AmbiguousFunction(_) | Self::Invocation(_) => {
                ErrorKind::FunctionInvocation
            }
            Self::UnsupportedFilterable { .. } | Self::Backend { .. } => {
                ErrorKind::BackendDispatch
            }
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = FilterError> = std::result::Result<T, E>;

/// Public error returned by every [`ApiFilter`](crate::api::ApiFilter) operation
///
/// The message is the message of the wrapped cause, which stays reachable
/// through [`std::error::Error::source`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source}")]
pub struct ApiFilterError {
    #[source]
    source: FilterError,
}

impl ApiFilterError {
    /// Get the category of the wrapped error
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    /// Get the wrapped error
    pub fn cause(&self) -> &FilterError {
        &self.source
    }
}

impl From<FilterError> for ApiFilterError {
    fn from(source: FilterError) -> Self {
        Self { source }
    }
}
