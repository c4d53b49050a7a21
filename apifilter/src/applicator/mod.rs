//! Filter application backends
//!
//! An [`Applicator`] applies filters to one kind of [`Filterable`]. The
//! [`FilterApplicator`] keeps the registered applicators in priority order and
//! dispatches every filter to the first one supporting the filterable.

pub mod array;
pub mod sql;

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

pub use array::ArrayApplicator;
pub use sql::SqlApplicator;

use crate::domain::filter::{
    Filter, FilterFunction, FilterIn, FilterWithOperator, FunctionParameter,
};
use crate::domain::filterable::Filterable;
use crate::domain::filters::Filters;
use crate::domain::functions::{FunctionCreator, Functions};
use crate::domain::parameter::Parameter;
use crate::domain::value::Value;
use crate::error::{FilterError, Result};
use crate::utils::prioritized::Prioritized;

/// Placeholder -> raw value, in filter order
pub type PreparedValues = Map<String, JsonValue>;

// ============================================================================
// Applicator Trait
// ============================================================================

/// Backend applying filters to one filterable type
///
/// Applying never mutates the given filterable; implementations build a new
/// one.
pub trait Applicator: Send + Sync {
    /// Backend name for logs and errors
    fn name(&self) -> &'static str;

    fn supports(&self, filterable: &Filterable) -> bool;

    fn apply_filter_with_operator(
        &self,
        filter: &FilterWithOperator,
        filterable: &Filterable,
    ) -> Result<Filterable>;

    fn apply_filter_in(&self, filter: &FilterIn, filterable: &Filterable) -> Result<Filterable>;

    /// Run the function body with its resolved parameters
    fn apply_filter_function(
        &self,
        filter: &FilterFunction,
        filterable: &Filterable,
        parameters: &[FunctionParameter],
        context: &FunctionContext<'_>,
    ) -> Result<Filterable> {
        filter.handle().call(context, filterable, parameters)
    }

    /// Values bound by one filter
    ///
    /// IN filters bind one placeholder per item, function filters and
    /// function parameters bind nothing.
    fn prepared_value(&self, filter: &Filter) -> PreparedValues {
        let mut prepared = PreparedValues::new();
        match filter {
            Filter::WithOperator(f) => {
                prepared.insert(f.placeholder(), raw(f.value()));
            }
            Filter::In(f) => {
                for (index, item) in f.items().iter().enumerate() {
                    prepared.insert(f.item_placeholder(index), item.clone());
                }
            }
            Filter::Function(_) | Filter::FunctionParameter(_) => {}
        }
        prepared
    }

    /// Values bound by one function
    ///
    /// Without parameter definitions every parameter binds `<name>_fun`,
    /// otherwise the values of the filters the declared function applies.
    fn prepared_values_for_function(
        &self,
        parameters: &[FunctionParameter],
        definitions: &[Parameter],
    ) -> Result<PreparedValues> {
        let mut prepared = PreparedValues::new();
        if definitions.is_empty() {
            for parameter in parameters {
                prepared.insert(parameter.placeholder(), raw(parameter.value()));
            }
            return Ok(prepared);
        }

        let filters = FunctionCreator::default().filters_from_parameters(parameters, definitions)?;
        for filter in &filters {
            prepared.extend(self.prepared_value(filter));
        }
        Ok(prepared)
    }
}

fn raw(value: &Value) -> JsonValue {
    value.as_raw().cloned().unwrap_or(JsonValue::Null)
}

// ============================================================================
// Function Context
// ============================================================================

/// What a function body can reach while it runs
pub struct FunctionContext<'a> {
    applicator: &'a FilterApplicator,
    functions: &'a Functions,
    filters: &'a Filters,
}

impl<'a> FunctionContext<'a> {
    pub fn new(
        applicator: &'a FilterApplicator,
        functions: &'a Functions,
        filters: &'a Filters,
    ) -> Self {
        Self {
            applicator,
            functions,
            filters,
        }
    }

    /// Apply one filter through the registered backends
    pub fn apply_filter(&self, filter: &Filter, filterable: &Filterable) -> Result<Filterable> {
        self.applicator
            .apply(filter, filterable, self.filters, self.functions)
    }

    /// Apply a whole collection through the registered backends
    pub fn apply_all(&self, filters: &Filters, filterable: &Filterable) -> Result<Filterable> {
        self.applicator
            .apply_all(filters, filterable, self.functions)
    }

    /// Filters of the pass the function was resolved in
    pub fn filters(&self) -> &'a Filters {
        self.filters
    }

    pub fn functions(&self) -> &'a Functions {
        self.functions
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Priority-ordered applicator registry
#[derive(Default)]
pub struct FilterApplicator {
    applicators: Prioritized<Box<dyn Applicator>>,
}

impl FilterApplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A: Applicator + 'static>(&mut self, applicator: A, priority: i32) {
        self.register_boxed(Box::new(applicator), priority);
    }

    pub fn register_boxed(&mut self, applicator: Box<dyn Applicator>, priority: i32) {
        debug!(applicator = applicator.name(), priority, "Applicator registered");
        self.applicators.add(applicator, priority);
    }

    pub fn len(&self) -> usize {
        self.applicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applicators.is_empty()
    }

    /// Highest priority applicator supporting the filterable
    pub fn find(&self, filterable: &Filterable) -> Result<&dyn Applicator> {
        self.applicators
            .iter()
            .find(|applicator| applicator.supports(filterable))
            .map(|applicator| applicator.as_ref())
            .ok_or_else(|| FilterError::UnsupportedFilterable {
                type_name: filterable.type_name().to_string(),
            })
    }

    /// Apply one filter
    ///
    /// `filters` is the collection the filter was parsed in; function filters
    /// take their parameters from it.
    pub fn apply(
        &self,
        filter: &Filter,
        filterable: &Filterable,
        filters: &Filters,
        functions: &Functions,
    ) -> Result<Filterable> {
        let applicator = self.find(filterable)?;
        trace!(
            applicator = applicator.name(),
            column = %filter.column(),
            title = %filter.title(),
            "Applying filter"
        );

        match filter {
            Filter::WithOperator(f) => applicator.apply_filter_with_operator(f, filterable),
            Filter::In(f) => applicator.apply_filter_in(f, filterable),
            Filter::Function(f) => {
                let parameters = Self::parameters_for_function(f, filters, functions)?;
                let context = FunctionContext::new(self, functions, filters);
                applicator.apply_filter_function(f, filterable, &parameters, &context)
            }
            Filter::FunctionParameter(_) => Ok(filterable.clone()),
        }
    }

    /// Apply every filter in collection order
    pub fn apply_all(
        &self,
        filters: &Filters,
        filterable: &Filterable,
        functions: &Functions,
    ) -> Result<Filterable> {
        let mut current = filterable.clone();
        for filter in filters {
            current = self.apply(filter, &current, filters, functions)?;
        }
        Ok(current)
    }

    /// Values bound by one filter
    pub fn prepared_value(
        &self,
        filter: &Filter,
        filterable: &Filterable,
        filters: &Filters,
        functions: &Functions,
    ) -> Result<PreparedValues> {
        let applicator = self.find(filterable)?;
        match filter {
            Filter::Function(f) => {
                let parameters = Self::parameters_for_function(f, filters, functions)?;
                let definitions = functions.parameter_definitions_for(f.column())?;
                applicator.prepared_values_for_function(&parameters, definitions)
            }
            _ => Ok(applicator.prepared_value(filter)),
        }
    }

    /// Values bound by a whole collection, merged in filter order
    pub fn prepared_values(
        &self,
        filters: &Filters,
        filterable: &Filterable,
        functions: &Functions,
    ) -> Result<PreparedValues> {
        let mut prepared = PreparedValues::new();
        for filter in filters {
            prepared.extend(self.prepared_value(filter, filterable, filters, functions)?);
        }
        Ok(prepared)
    }

    /// Parameters of a function filter, in declared order
    fn parameters_for_function(
        filter: &FilterFunction,
        filters: &Filters,
        functions: &Functions,
    ) -> Result<Vec<FunctionParameter>> {
        functions
            .parameters_for(filter.column())?
            .iter()
            .map(|parameter| filters.function_parameter(parameter).cloned())
            .collect()
    }
}
