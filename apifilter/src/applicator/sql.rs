//! SQL string backend
//!
//! Appends `AND` conditions with named placeholders to a SQL string:
//!
//! ```text
//! SELECT * FROM t
//!   -> SELECT * FROM t WHERE 1 AND age > :age_gt
//!   -> SELECT * FROM t WHERE 1 AND age > :age_gt AND size IN (:size_in_0, :size_in_1)
//! ```
//!
//! Values are never interpolated; bind them with the prepared values.

use crate::domain::filter::{FilterIn, FilterWithOperator};
use crate::domain::filterable::Filterable;
use crate::error::{FilterError, Result};

use super::Applicator;

const APPLICATOR_NAME: &str = "sql";

/// Applies filters to `String` (or `&'static str`) SQL
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlApplicator;

impl SqlApplicator {
    pub fn new() -> Self {
        Self
    }

    fn sql<'f>(&self, filterable: &'f Filterable) -> Result<&'f str> {
        filterable
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| filterable.downcast_ref::<&'static str>().copied())
            .ok_or_else(|| {
                FilterError::backend(
                    APPLICATOR_NAME,
                    format!("expected SQL string, got {}", filterable.type_name()),
                )
            })
    }

    /// SQL ready for another `AND` condition
    fn with_where(sql: &str) -> String {
        if sql.to_lowercase().contains("where") {
            sql.to_string()
        } else {
            format!("{} WHERE 1", sql)
        }
    }
}

impl Applicator for SqlApplicator {
    fn name(&self) -> &'static str {
        APPLICATOR_NAME
    }

    fn supports(&self, filterable: &Filterable) -> bool {
        filterable.is::<String>() || filterable.is::<&'static str>()
    }

    fn apply_filter_with_operator(
        &self,
        filter: &FilterWithOperator,
        filterable: &Filterable,
    ) -> Result<Filterable> {
        let sql = Self::with_where(self.sql(filterable)?);
        Ok(Filterable::new(format!(
            "{} AND {} {} :{}",
            sql,
            filter.column(),
            filter.operator().symbol(),
            filter.placeholder()
        )))
    }

    fn apply_filter_in(&self, filter: &FilterIn, filterable: &Filterable) -> Result<Filterable> {
        if filter.items().is_empty() {
            return Err(FilterError::backend(
                APPLICATOR_NAME,
                format!("IN filter on column \"{}\" has no values", filter.column()),
            ));
        }

        let sql = Self::with_where(self.sql(filterable)?);
        let placeholders: Vec<String> = (0..filter.items().len())
            .map(|index| format!(":{}", filter.item_placeholder(index)))
            .collect();

        Ok(Filterable::new(format!(
            "{} AND {} IN ({})",
            sql,
            filter.column(),
            placeholders.join(", ")
        )))
    }
}
