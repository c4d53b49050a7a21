//! In-memory array backend
//!
//! Collects filters as `[column, operator, value]` triples into a
//! `Vec<serde_json::Value>`. Handy for tests and for hosts that translate the
//! triples themselves.

use serde_json::{Value as JsonValue, json};

use crate::domain::filter::{FilterIn, FilterWithOperator};
use crate::domain::filterable::Filterable;
use crate::error::{FilterError, Result};

use super::Applicator;

const APPLICATOR_NAME: &str = "array";

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayApplicator;

impl ArrayApplicator {
    pub fn new() -> Self {
        Self
    }

    fn with_condition(filterable: &Filterable, condition: JsonValue) -> Result<Filterable> {
        let mut conditions = filterable.cloned::<Vec<JsonValue>>().ok_or_else(|| {
            FilterError::backend(
                APPLICATOR_NAME,
                format!(
                    "expected a list of conditions, got {}",
                    filterable.type_name()
                ),
            )
        })?;
        conditions.push(condition);
        Ok(Filterable::new(conditions))
    }
}

impl Applicator for ArrayApplicator {
    fn name(&self) -> &'static str {
        APPLICATOR_NAME
    }

    fn supports(&self, filterable: &Filterable) -> bool {
        filterable.is::<Vec<JsonValue>>()
    }

    fn apply_filter_with_operator(
        &self,
        filter: &FilterWithOperator,
        filterable: &Filterable,
    ) -> Result<Filterable> {
        let value = filter.value().as_raw().cloned().unwrap_or(JsonValue::Null);
        Self::with_condition(
            filterable,
            json!([filter.column(), filter.operator().symbol(), value]),
        )
    }

    fn apply_filter_in(&self, filter: &FilterIn, filterable: &Filterable) -> Result<Filterable> {
        Self::with_condition(
            filterable,
            json!([filter.column(), filter.operator(), filter.items()]),
        )
    }
}
