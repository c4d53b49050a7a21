//! ApiFilter façade
//!
//! Wires the query parameter parser, the function registry and the
//! applicator registry together. Setup (registering applicators and
//! functions) takes `&mut self`; parsing and applying take `&self`, so a
//! configured instance can be shared between threads.
//!
//! Every method returns [`ApiFilterError`] on failure.

use tracing::debug;

use crate::applicator::{Applicator, FilterApplicator, FunctionContext, PreparedValues};
use crate::core::config::ApiFilterConfig;
use crate::core::constants::DEFAULT_FUNCTION_COLUMN;
use crate::domain::filter::{Filter, FilterFactory, FunctionParameter};
use crate::domain::filterable::Filterable;
use crate::domain::filters::Filters;
use crate::domain::functions::{FunctionCreator, FunctionHandle, Functions};
use crate::domain::parameter::ParameterSpec;
use crate::error::{self, ApiFilterError, FilterError};
use crate::parser::{QueryParameters, QueryParametersParser};

type Result<T> = std::result::Result<T, ApiFilterError>;

pub struct ApiFilter {
    functions: Functions,
    applicator: FilterApplicator,
    parser: QueryParametersParser,
    creator: FunctionCreator,
}

impl Default for ApiFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiFilter {
    pub fn new() -> Self {
        Self::with_function_column(DEFAULT_FUNCTION_COLUMN)
    }

    /// Use another reserved column for explicit function definitions
    pub fn with_function_column(function_column: impl Into<String>) -> Self {
        let factory = FilterFactory::new();
        Self {
            functions: Functions::new(),
            applicator: FilterApplicator::new(),
            parser: QueryParametersParser::new(factory, function_column),
            creator: FunctionCreator::new(factory),
        }
    }

    /// Build from configuration, declaring every configured function
    pub fn from_config(config: &ApiFilterConfig) -> Result<Self> {
        let mut api_filter = Self::with_function_column(config.function_column.clone());
        for declaration in &config.functions {
            api_filter
                .declare_function(&declaration.name, declaration.parameters.clone())?;
        }
        debug!(
            function_column = %config.function_column,
            functions = api_filter.functions.len(),
            "ApiFilter configured"
        );
        Ok(api_filter)
    }

    pub fn function_column(&self) -> &str {
        self.parser.function_column()
    }

    pub fn functions(&self) -> &Functions {
        &self.functions
    }

    pub fn register_applicator<A: Applicator + 'static>(
        &mut self,
        applicator: A,
        priority: i32,
    ) -> &mut Self {
        self.applicator.register(applicator, priority);
        self
    }

    /// Register a function with a hand-written body
    ///
    /// The body gets the parameters in the order of `parameters`.
    pub fn register_function<I, S, F>(
        &mut self,
        name: &str,
        parameters: I,
        body: F,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&FunctionContext<'_>, &Filterable, &[FunctionParameter]) -> error::Result<Filterable>
            + Send
            + Sync
            + 'static,
    {
        let parameters = parameters.into_iter().map(Into::into).collect();
        let handle = FunctionHandle::new(name, body);
        self.functions
            .register(name, parameters, handle, Vec::new())?;
        Ok(self)
    }

    /// Declare a function from parameter descriptors
    ///
    /// The function applies one filter per descriptor. Descriptors with a
    /// default value are not expected in the query.
    pub fn declare_function<I>(&mut self, name: &str, parameters: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<ParameterSpec>,
    {
        let definitions = self
            .creator
            .normalize_parameters(parameters.into_iter().map(Into::into))?;
        let names = self.creator.parameter_names(&definitions);
        let handle = self.creator.create_by_parameters(name, definitions.clone());

        self.functions.register(name, names, handle, definitions)?;
        debug!(function = %name, "Function declared");
        Ok(self)
    }

    pub fn parse_filters(&self, query: &QueryParameters) -> Result<Filters> {
        Ok(self.parser.parse(query, &self.functions)?)
    }

    /// Apply one filter, `filters` being the collection it was parsed in
    pub fn apply_filter(
        &self,
        filter: &Filter,
        filterable: &Filterable,
        filters: &Filters,
    ) -> Result<Filterable> {
        Ok(self
            .applicator
            .apply(filter, filterable, filters, &self.functions)?)
    }

    pub fn apply_filters(&self, filters: &Filters, filterable: &Filterable) -> Result<Filterable> {
        Ok(self
            .applicator
            .apply_all(filters, filterable, &self.functions)?)
    }

    pub fn prepared_value(
        &self,
        filter: &Filter,
        filterable: &Filterable,
        filters: &Filters,
    ) -> Result<PreparedValues> {
        Ok(self
            .applicator
            .prepared_value(filter, filterable, filters, &self.functions)?)
    }

    pub fn prepared_values(
        &self,
        filters: &Filters,
        filterable: &Filterable,
    ) -> Result<PreparedValues> {
        Ok(self
            .applicator
            .prepared_values(filters, filterable, &self.functions)?)
    }

    /// Parse the query and run one function on the filterable
    pub fn execute_function(
        &self,
        name: &str,
        query: &QueryParameters,
        filterable: &Filterable,
    ) -> Result<Filterable> {
        let filters = self.parse_filters(query)?;
        Ok(self
            .functions
            .execute(name, &filters, filterable, &self.applicator)?)
    }

    /// Parse the query, run one function and collect the values it binds
    pub fn apply_function(
        &self,
        name: &str,
        query: &QueryParameters,
        filterable: &Filterable,
    ) -> Result<(Filterable, PreparedValues)> {
        let filters = self.parse_filters(query)?;
        let applied = self
            .functions
            .execute(name, &filters, filterable, &self.applicator)?;

        let function = filters
            .iter()
            .find(|filter| matches!(filter, Filter::Function(f) if f.column() == name))
            .ok_or_else(|| {
                FilterError::Invocation(format!("Function \"{name}\" was not given in the query."))
            })?;
        let prepared = self
            .applicator
            .prepared_value(function, filterable, &filters, &self.functions)?;

        Ok((applied, prepared))
    }
}
