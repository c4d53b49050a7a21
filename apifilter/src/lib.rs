//! Query parameter filters for any backend
//!
//! `apifilter` turns HTTP query parameters into an ordered list of typed
//! filters and applies them to a backend target ("filterable"), such as a SQL
//! string or a list of conditions. Besides plain filters (`eq`, `gt`, `lt`,
//! `gte`, `lte`, `in`) the query can call named functions: registered with a
//! hand-written body, or declared from parameter descriptors.
//!
//! ```ignore
//! let mut api_filter = ApiFilter::new();
//! api_filter.register_applicator(SqlApplicator::new(), PRIORITY_HIGHEST);
//!
//! let filters = api_filter.parse_filters(&query)?;
//! let sql = api_filter.apply_filters(&filters, &Filterable::new(sql))?;
//! let prepared = api_filter.prepared_values(&filters, &Filterable::new(sql))?;
//! ```

pub mod api;
pub mod applicator;
pub mod core;
pub mod domain;
pub mod error;
pub mod parser;
pub mod utils;

pub use api::ApiFilter;
pub use applicator::{
    Applicator, ArrayApplicator, FilterApplicator, FunctionContext, PreparedValues, SqlApplicator,
};
pub use crate::core::config::{ApiFilterConfig, FunctionDeclaration};
pub use domain::{
    Filter, FilterKind, Filterable, Filters, FunctionHandle, FunctionParameter, Operator, Parameter,
    ParameterSpec, Value,
};
pub use error::{ApiFilterError, ErrorKind, FilterError};
pub use parser::{QueryParameters, QueryParametersParser};
