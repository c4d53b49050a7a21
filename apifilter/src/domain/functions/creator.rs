//! Functions declared from parameter descriptors
//!
//! A declared function has no hand-written body: its body turns the live
//! parameters (and declared defaults) into ordinary filters and applies them
//! through the registered backends.

use std::sync::Arc;

use crate::domain::filter::{FilterFactory, FunctionParameter};
use crate::domain::filters::Filters;
use crate::domain::parameter::{Parameter, ParameterSpec};
use crate::error::{FilterError, Result};

use super::FunctionHandle;

#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionCreator {
    factory: FilterFactory,
}

impl FunctionCreator {
    pub fn new(factory: FilterFactory) -> Self {
        Self { factory }
    }

    /// Turn descriptors into parameters, a later descriptor replaces an
    /// earlier one with the same name in place
    pub fn normalize_parameters(
        &self,
        specs: impl IntoIterator<Item = ParameterSpec>,
    ) -> Result<Vec<Parameter>> {
        let mut parameters: Vec<Parameter> = Vec::new();
        for spec in specs {
            let parameter = Parameter::from_spec(spec)?;
            match parameters.iter_mut().find(|p| p.name() == parameter.name()) {
                Some(existing) => *existing = parameter,
                None => parameters.push(parameter),
            }
        }
        Ok(parameters)
    }

    /// Names a caller must supply (parameters without a default)
    pub fn parameter_names(&self, parameters: &[Parameter]) -> Vec<String> {
        parameters
            .iter()
            .filter(|parameter| !parameter.has_default_value())
            .map(|parameter| parameter.name().to_string())
            .collect()
    }

    /// Create the body of a declared function
    pub fn create_by_parameters(&self, name: &str, definitions: Vec<Parameter>) -> FunctionHandle {
        let creator = *self;
        let definitions = Arc::new(definitions);

        FunctionHandle::new(name, move |context, filterable, parameters| {
            let filters = creator.filters_from_parameters(parameters, &definitions)?;
            context.apply_all(&filters, filterable)
        })
    }

    /// Filters a declared function applies, in definition order
    ///
    /// Defaults are bound under `<name>_fun`, live parameters keep the
    /// placeholder of the created filter.
    pub fn filters_from_parameters(
        &self,
        parameters: &[FunctionParameter],
        definitions: &[Parameter],
    ) -> Result<Filters> {
        let mut filters = Filters::new();

        for definition in definitions {
            let filter = match definition.default_value() {
                Some(default_value) => {
                    let mut filter = self.factory.create(
                        definition.column(),
                        definition.filter(),
                        default_value.clone(),
                    )?;
                    filter.set_full_title(definition.title_for_default_value());
                    filter
                }
                None => {
                    let parameter = parameters
                        .iter()
                        .find(|parameter| parameter.column() == definition.name())
                        .ok_or_else(|| {
                            FilterError::Invocation(format!(
                                "Parameter \"{}\" is required and must have a value.",
                                definition.name()
                            ))
                        })?;
                    self.factory.create(
                        definition.column(),
                        definition.filter(),
                        parameter.value().clone(),
                    )?
                }
            };
            filters.add(filter);
        }

        Ok(filters)
    }
}
