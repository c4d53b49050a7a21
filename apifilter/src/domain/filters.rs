//! Ordered filter collection
//!
//! Output of the query parameter parser and input of the function executor.
//! Insertion order is kept so backends apply filters deterministically.

use crate::error::{FilterError, Result};

use super::filter::{Filter, FunctionParameter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    filters: Vec<Filter>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filter: impl Into<Filter>) {
        self.filters.push(filter.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn as_slice(&self) -> &[Filter] {
        &self.filters
    }

    /// Filters targeting any of the given columns, in collection order
    pub fn filter_by_columns<S: AsRef<str>>(&self, columns: &[S]) -> Filters {
        self.filters
            .iter()
            .filter(|filter| columns.iter().any(|c| c.as_ref() == filter.column()))
            .cloned()
            .collect()
    }

    /// Get the function parameter for `name`
    pub fn function_parameter(&self, name: &str) -> Result<&FunctionParameter> {
        self.filters
            .iter()
            .find_map(|filter| match filter {
                Filter::FunctionParameter(parameter) if parameter.column() == name => {
                    Some(parameter)
                }
                _ => None,
            })
            .ok_or_else(|| {
                FilterError::Invocation(format!("There is no function parameter \"{}\".", name))
            })
    }
}

impl From<Vec<Filter>> for Filters {
    fn from(filters: Vec<Filter>) -> Self {
        Self { filters }
    }
}

impl FromIterator<Filter> for Filters {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

impl Extend<Filter> for Filters {
    fn extend<I: IntoIterator<Item = Filter>>(&mut self, iter: I) {
        self.filters.extend(iter);
    }
}

impl IntoIterator for Filters {
    type Item = Filter;
    type IntoIter = std::vec::IntoIter<Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.into_iter()
    }
}

impl<'a> IntoIterator for &'a Filters {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{FilterWithOperator, Operator};

    fn sample() -> Filters {
        Filters::from(vec![
            FilterWithOperator::new("name", "Jon", Operator::Eq).into(),
            FunctionParameter::new("zone", "all").into(),
            FilterWithOperator::new("age", 18, Operator::Gt).into(),
            FunctionParameter::new("bucket", "common").into(),
        ])
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut filters = Filters::new();
        filters.add(FilterWithOperator::new("b", 1, Operator::Eq));
        filters.add(FilterWithOperator::new("a", 2, Operator::Eq));

        let columns: Vec<_> = filters.iter().map(Filter::column).collect();
        assert_eq!(columns, vec!["b", "a"]);
    }

    #[test]
    fn test_filter_by_columns_is_stable() {
        let filters = sample();
        let subset = filters.filter_by_columns(&["bucket", "name"]);

        let columns: Vec<_> = subset.iter().map(Filter::column).collect();
        assert_eq!(columns, vec!["name", "bucket"]);
    }

    #[test]
    fn test_function_parameter_exact_match() {
        let filters = sample();
        let parameter = filters.function_parameter("zone").unwrap();
        assert_eq!(parameter.column(), "zone");

        // "name" exists but is not a function parameter
        let err = filters.function_parameter("name").unwrap_err();
        assert_eq!(err.to_string(), "There is no function parameter \"name\".");
    }
}
