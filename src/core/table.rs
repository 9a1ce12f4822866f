use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

/// Column-addressable numeric dataset produced by a data source.
///
/// Columns keep insertion order and always share one row count. Rows are only
/// ever appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: IndexMap<String, Vec<f64>>,
    rows: usize,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn with_columns<I, S>(names: I) -> ScopeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = IndexMap::new();
        for name in names {
            let name = name.into();
            if columns.insert(name.clone(), Vec::new()).is_some() {
                return Err(ScopeError::InvalidData(format!(
                    "duplicate column name `{name}`"
                )));
            }
        }
        Ok(Self { columns, rows: 0 })
    }

    /// Builds a table from complete columns, which must all have equal length.
    pub fn from_columns<I, S>(columns: I) -> ScopeResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        let mut rows: Option<usize> = None;
        for (name, values) in columns {
            let name = name.into();
            match rows {
                Some(expected) if expected != values.len() => {
                    return Err(ScopeError::InvalidData(format!(
                        "column `{name}` has {} rows, expected {expected}",
                        values.len()
                    )));
                }
                _ => rows = Some(values.len()),
            }
            if table.columns.insert(name.clone(), values).is_some() {
                return Err(ScopeError::InvalidData(format!(
                    "duplicate column name `{name}`"
                )));
            }
        }
        table.rows = rows.unwrap_or(0);
        Ok(table)
    }

    /// Appends one row; its width must match the column count.
    pub fn push_row(&mut self, row: &[f64]) -> ScopeResult<()> {
        if row.len() != self.columns.len() {
            return Err(ScopeError::InvalidData(format!(
                "row has {} fields, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        for (column, &value) in self.columns.values_mut().zip(row) {
            column.push(value);
        }
        self.rows += 1;
        Ok(())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Positional lookup returning the column name with its samples.
    #[must_use]
    pub fn column_at(&self, index: usize) -> Option<(&str, &[f64])> {
        self.columns
            .get_index(index)
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_row_rejects_wrong_width() {
        let mut table = Table::with_columns(["a", "b"]).expect("table");
        table.push_row(&[1.0, 2.0]).expect("row");
        assert!(table.push_row(&[1.0]).is_err());
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn from_columns_rejects_ragged_columns() {
        let err = Table::from_columns([("a", vec![1.0, 2.0]), ("b", vec![1.0])])
            .expect_err("ragged columns must fail");
        assert!(matches!(err, ScopeError::InvalidData(_)));
    }

    #[test]
    fn column_at_follows_insertion_order() {
        let table =
            Table::from_columns([("z", vec![1.0]), ("a", vec![2.0])]).expect("table");
        assert_eq!(table.column_at(0).map(|(name, _)| name), Some("z"));
        assert_eq!(table.column_at(1).map(|(_, values)| values), Some(&[2.0][..]));
        assert!(table.column_at(2).is_none());
    }
}
