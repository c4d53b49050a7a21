//! Filter variants and their factory

mod factory;
mod types;

pub use factory::FilterFactory;
pub use types::{
    Filter, FilterFunction, FilterIn, FilterKind, FilterWithOperator, FunctionParameter, Operator,
};
