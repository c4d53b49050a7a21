//! Function registry
//!
//! A function is a named group of parameters resolved into one semantic
//! filter. The registry stores, per function:
//! - ordered parameter names (the parameters a caller must supply)
//! - the handle executing the function body
//! - parameter definitions, when the function was declared from descriptors
//!
//! Parameter names are unique across all registered functions, so a bare
//! parameter column always points to at most one function.

mod creator;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

pub use creator::FunctionCreator;

use crate::applicator::{FilterApplicator, FunctionContext};
use crate::domain::filter::FunctionParameter;
use crate::domain::filterable::Filterable;
use crate::domain::filters::Filters;
use crate::domain::parameter::Parameter;
use crate::error::{FilterError, Result};

/// Signature of a function body
///
/// The body receives the application context (to re-apply ordinary filters
/// through the registered backends), the filterable and the resolved
/// parameters in declared order.
pub type FunctionBody =
    dyn Fn(&FunctionContext<'_>, &Filterable, &[FunctionParameter]) -> Result<Filterable>
        + Send
        + Sync;

/// Named capability wrapping a function body
///
/// Two handles are equal when they carry the same function name.
#[derive(Clone)]
pub struct FunctionHandle {
    name: String,
    body: Arc<FunctionBody>,
}

impl FunctionHandle {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&FunctionContext<'_>, &Filterable, &[FunctionParameter]) -> Result<Filterable>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the body
    pub fn call(
        &self,
        context: &FunctionContext<'_>,
        filterable: &Filterable,
        parameters: &[FunctionParameter],
    ) -> Result<Filterable> {
        (self.body)(context, filterable, parameters)
    }
}

impl PartialEq for FunctionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for FunctionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionHandle")
            .field("name", &self.name)
            .finish()
    }
}

/// One registered function
#[derive(Debug, Clone)]
struct FunctionDefinition {
    parameters: Vec<String>,
    handle: FunctionHandle,
    definitions: Vec<Parameter>,
}

/// Registry of functions, configured once and read by every parse pass
#[derive(Debug, Clone, Default)]
pub struct Functions {
    /// Function definitions in registration order
    functions: Vec<(String, FunctionDefinition)>,
    /// Parameter name -> owning function name
    owners: HashMap<String, String>,
}

impl Functions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function
    ///
    /// Re-registering a name replaces the previous function. Fails when the
    /// name or parameter list is empty, or when a parameter already belongs to
    /// another function.
    pub fn register(
        &mut self,
        name: &str,
        parameters: Vec<String>,
        handle: FunctionHandle,
        definitions: Vec<Parameter>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(FilterError::Declaration(
                "Function name must be defined.".to_string(),
            ));
        }
        if parameters.is_empty() {
            return Err(FilterError::Declaration(format!(
                "Function \"{}\" must have some parameters.",
                name
            )));
        }

        let mut seen: HashMap<&str, &str> = HashMap::new();
        for parameter in &parameters {
            let owner = self
                .owners
                .get(parameter)
                .map(String::as_str)
                .filter(|owner| *owner != name)
                .or_else(|| seen.get(parameter.as_str()).copied());
            if let Some(owner) = owner {
                return Err(FilterError::Declaration(format!(
                    "Parameter \"{}\" is already used by function \"{}\".",
                    parameter, owner
                )));
            }
            seen.insert(parameter.as_str(), name);
        }

        self.owners.retain(|_, owner| owner != name);
        for parameter in &parameters {
            self.owners.insert(parameter.clone(), name.to_string());
        }

        let definition = FunctionDefinition {
            parameters,
            handle,
            definitions,
        };
        match self.functions.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = definition,
            None => self.functions.push((name.to_string(), definition)),
        }

        debug!(function = %name, "Function registered");
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.functions.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn get(&self, name: &str) -> Result<&FunctionDefinition> {
        self.functions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, definition)| definition)
            .ok_or_else(|| FilterError::function_not_registered(name))
    }

    /// Parameter names of a function, in declared order
    pub fn parameters_for(&self, name: &str) -> Result<&[String]> {
        Ok(&self.get(name)?.parameters)
    }

    pub fn parameter_definitions_for(&self, name: &str) -> Result<&[Parameter]> {
        Ok(&self.get(name)?.definitions)
    }

    pub fn handle(&self, name: &str) -> Result<&FunctionHandle> {
        Ok(&self.get(name)?.handle)
    }

    /// Functions owning the given parameter
    pub fn function_names_by_parameter(&self, parameter: &str) -> Vec<&str> {
        self.functions
            .iter()
            .filter(|(_, definition)| definition.parameters.iter().any(|p| p == parameter))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Functions whose parameter set equals the given names, in any order
    pub fn function_names_by_all_parameters<S: AsRef<str>>(&self, parameters: &[S]) -> Vec<&str> {
        let mut wanted: Vec<&str> = parameters.iter().map(AsRef::as_ref).collect();
        wanted.sort_unstable();

        self.functions
            .iter()
            .filter(|(_, definition)| {
                let mut declared: Vec<&str> =
                    definition.parameters.iter().map(String::as_str).collect();
                declared.sort_unstable();
                declared == wanted
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Execute a function with its parameters taken from `filters`
    pub fn execute(
        &self,
        name: &str,
        filters: &Filters,
        filterable: &Filterable,
        applicator: &FilterApplicator,
    ) -> Result<Filterable> {
        let definition = self.get(name)?;
        let matched = filters.filter_by_columns(&definition.parameters);
        if matched.len() != definition.parameters.len() {
            return Err(FilterError::Invocation(format!(
                "There are not filters ({}) for parameters ({}).",
                matched.len(),
                definition.parameters.len()
            )));
        }

        let parameters = definition
            .parameters
            .iter()
            .map(|parameter| matched.function_parameter(parameter).cloned())
            .collect::<Result<Vec<_>>>()?;

        debug!(function = %name, parameters = parameters.len(), "Executing function");
        let context = FunctionContext::new(applicator, self, filters);
        definition.handle.call(&context, filterable, &parameters)
    }
}
