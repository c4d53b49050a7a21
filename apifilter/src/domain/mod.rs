//! Domain model: values, filters, parameters and functions

pub mod filter;
pub mod filterable;
pub mod filters;
pub mod functions;
pub mod parameter;
pub mod value;

pub use filter::{Filter, FilterFactory, FilterKind, FunctionParameter, Operator};
pub use filterable::Filterable;
pub use filters::Filters;
pub use functions::{FunctionCreator, FunctionHandle, Functions};
pub use parameter::{Parameter, ParameterSpec};
pub use value::Value;
