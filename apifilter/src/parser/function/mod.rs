//! Function recognition
//!
//! [`FunctionParser`] is a composite of five strategies, tried in priority
//! order:
//! 1. explicit by list: `fun[]=fullName&firstName=Jon&surname=Snow`
//! 2. explicit by name: `fullName=(Jon,Snow)`
//! 3. explicit by tuple: `(fun,firstName,surname)=(fullName,Jon,Snow)`
//! 4. implicit by tuple: `(surname,firstName)=(Snow,Jon)`
//! 5. implicit by value: `firstName=Jon&surname=Snow`
//!
//! All of them share the pass-scoped [`ParseState`](super::context::ParseState):
//! a function fires at most once per pass and every parameter is emitted at
//! most once. Top-level columns whose value a function read are consumed by
//! the composite so they never reach the ordinary filter strategies. A
//! parameter column whose function took its values from a name or tuple
//! invocation is an ordinary filter.

mod explicit;
mod implicit;

use serde_json::Value as JsonValue;
use tracing::trace;

pub use explicit::{ExplicitByListParser, ExplicitByNameParser, ExplicitByTupleParser};
pub use implicit::{ImplicitByTupleParser, ImplicitByValueParser};

use crate::core::constants::{
    PRIORITY_HIGH, PRIORITY_HIGHER, PRIORITY_HIGHEST, PRIORITY_LOW, PRIORITY_LOWEST,
};
use crate::domain::filter::Filter;
use crate::error::Result;
use crate::utils::prioritized::Prioritized;

use super::Parser;
use super::context::{ParseContext, QueryParameters};

pub struct FunctionParser {
    parsers: Prioritized<Box<dyn Parser>>,
}

impl Default for FunctionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionParser {
    pub fn new() -> Self {
        let mut parsers: Prioritized<Box<dyn Parser>> = Prioritized::new();
        parsers.add(Box::new(ExplicitByListParser), PRIORITY_HIGHEST);
        parsers.add(Box::new(ExplicitByNameParser), PRIORITY_HIGHER);
        parsers.add(Box::new(ExplicitByTupleParser), PRIORITY_HIGH);
        parsers.add(Box::new(ImplicitByTupleParser), PRIORITY_LOW);
        parsers.add(Box::new(ImplicitByValueParser), PRIORITY_LOWEST);
        Self { parsers }
    }

    fn find(
        &self,
        context: &ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Option<&dyn Parser>> {
        for parser in self.parsers.iter() {
            if parser.supports(context, column, value)? {
                return Ok(Some(parser.as_ref()));
            }
        }
        Ok(None)
    }
}

impl Parser for FunctionParser {
    fn name(&self) -> &'static str {
        "function"
    }

    fn supports(
        &self,
        context: &ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<bool> {
        if context.state().is_column_consumed(column) {
            return Ok(true);
        }
        Ok(self.find(context, column, value)?.is_some())
    }

    fn parse(
        &self,
        context: &mut ParseContext<'_>,
        column: &str,
        value: &JsonValue,
    ) -> Result<Vec<Filter>> {
        match self.find(context, column, value)? {
            Some(parser) => {
                trace!(column = %column, strategy = parser.name(), "Parsing function");
                parser.parse(context, column, value)
            }
            None => {
                trace!(column = %column, "Column already consumed by a function");
                Ok(Vec::new())
            }
        }
    }
}

/// Function names listed in the reserved function column, if it is a list
fn listed_functions<'q>(query: &'q QueryParameters, function_column: &str) -> Vec<&'q str> {
    query
        .get(function_column)
        .and_then(JsonValue::as_array)
        .map(|names| names.iter().filter_map(JsonValue::as_str).collect())
        .unwrap_or_default()
}

/// Render a tuple token used as a function name
fn token_to_name(token: &JsonValue) -> String {
    match token {
        JsonValue::String(name) => name.clone(),
        other => other.to_string(),
    }
}
