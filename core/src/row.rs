//! Driver-neutral result rows and the mapping trait output types implement.

use joinery_types::{SqlField, Value};

use crate::error::{JoineryError, Result};

/// One result row: column names with their values, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push((column.into(), value));
    }

    /// Raw value of `column`; the first match wins when names repeat.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Converts `column` to `T`. A missing column reads as `NULL`, so it maps
    /// to `None` for `Option<T>` and is a mapping error for other types.
    pub fn get_as<T: SqlField>(&self, column: &str) -> Result<T> {
        let value = self.get(column).cloned().unwrap_or(Value::Null);
        T::from_value(value).map_err(|source| JoineryError::Mapping {
            column: column.to_string(),
            source,
        })
    }

    /// Converts `column` to `T`, yielding `T::default()` when the column is
    /// absent or `NULL`.
    ///
    /// Join projections leave unbound properties out of the select list, so
    /// generated [`FromRow`] impls read every property this way.
    pub fn get_or_default<T: SqlField + Default>(&self, column: &str) -> Result<T> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => T::from_value(value.clone()).map_err(|source| JoineryError::Mapping {
                column: column.to_string(),
                source,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

/// Builds a value from one result row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joinery_types::ValueError;

    #[test]
    fn missing_and_null_columns_default() {
        let row: Row = [("Id", Value::Int32(7)), ("Name", Value::Null)].into_iter().collect();
        assert_eq!(row.get_or_default::<i32>("Id").unwrap(), 7);
        assert_eq!(row.get_or_default::<String>("Name").unwrap(), "");
        assert_eq!(row.get_or_default::<i64>("Missing").unwrap(), 0);
    }

    #[test]
    fn missing_column_reads_as_null() {
        let row: Row = [("Id", Value::Int32(7))].into_iter().collect();
        assert_eq!(row.get_as::<Option<f64>>("Score").unwrap(), None);
        assert!(matches!(
            row.get_as::<f64>("Score"),
            Err(JoineryError::Mapping { source: ValueError::UnexpectedNull(_), .. })
        ));
    }

    #[test]
    fn mapping_errors_name_the_column() {
        let row: Row = [("Id", Value::from("seven"))].into_iter().collect();
        let err = row.get_as::<bool>("Id").unwrap_err();
        assert!(matches!(
            err,
            JoineryError::Mapping { ref column, source: ValueError::TypeMismatch { .. } | ValueError::Parse { .. } }
                if column == "Id"
        ));
    }
}
