//! A table: columns sharing row positions, keyed by column 0.

use serde::{Deserialize, Serialize};
use tessera_common::{Result, TesseraError, Value};

use crate::column::Column;

/// An ordered collection of equally sized columns.
///
/// Column 0 is the primary key: row lookups and removals address rows by
/// their value in that column.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows, read off the primary key column.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    pub fn column(&self, i: usize) -> Option<&Column> {
        self.columns.get(i)
    }

    pub fn column_mut(&mut self, i: usize) -> Option<&mut Column> {
        self.columns.get_mut(i)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The primary key column, if any columns exist.
    pub fn pk_column(&self) -> Option<&Column> {
        self.columns.first()
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Appends a column. When rows already exist, the new column is
    /// padded with its type's default value so all columns stay the same
    /// length.
    ///
    /// Padding an indexed column inserts the same default repeatedly, so
    /// its duplicate-free index ends up mapping the default to the last
    /// padded row only. Add indexed columns before loading rows, or call
    /// `enable_index` after the cells hold distinct values.
    pub fn add_column(&mut self, mut column: Column) {
        for _ in 0..self.num_rows() {
            column.push(column.dtype().default_value());
        }
        self.columns.push(column);
    }

    /// Appends one row across every column.
    ///
    /// Fails on arity or type mismatch; returns `Ok(false)` without
    /// modifying anything when an indexed column already contains one of
    /// the cells (indexes are duplicate-free), `Ok(true)` on success.
    pub fn add_row(&mut self, row: &[Value]) -> Result<bool> {
        if self.columns.is_empty() {
            return Err(TesseraError::EmptyTable);
        }
        if row.len() != self.columns.len() {
            return Err(TesseraError::RowArityMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(row) {
            if value.dtype() != column.dtype() {
                return Err(TesseraError::TypeMismatch {
                    column: column.name().to_string(),
                    expected: column.dtype().to_string(),
                    actual: value.dtype().to_string(),
                });
            }
            if column.is_indexed() && column.contains(value) {
                return Ok(false);
            }
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(value.clone());
        }
        Ok(true)
    }

    /// Returns the position of the row whose primary key equals `pk`.
    pub fn row_index_by_pk(&self, pk: &Value) -> Option<usize> {
        self.pk_column()?.find(pk)
    }

    /// Materializes the row whose primary key equals `pk`.
    pub fn row_by_pk(&self, pk: &Value) -> Option<Vec<Value>> {
        self.row(self.row_index_by_pk(pk)?)
    }

    /// Materializes the row at position `i`.
    pub fn row(&self, i: usize) -> Option<Vec<Value>> {
        if i >= self.num_rows() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| c.value_at(i).cloned().unwrap_or_else(|| c.dtype().default_value()))
                .collect(),
        )
    }

    /// Removes the row with the given primary key from every column.
    /// Returns whether a row was removed.
    pub fn remove_row(&mut self, pk: &Value) -> bool {
        let Some(i) = self.row_index_by_pk(pk) else {
            return false;
        };
        for column in &mut self.columns {
            column.remove_at(i);
        }
        true
    }

    /// Wipes all rows from every column, keeping the schema and index
    /// configuration.
    pub fn clear(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
    }

    pub(crate) fn push_column_unchecked(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Rebuilds every column's index from its stored rows.
    pub(crate) fn rebuild_indexes(&mut self) -> Result<()> {
        for column in &mut self.columns {
            column.rebuild_index()?;
        }
        Ok(())
    }
}
