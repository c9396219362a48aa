//! A single typed column with optional value index.

use serde::{Deserialize, Serialize};
use tessera_common::{DataType, Result, Value};
use tessera_index::BPlusTree;

/// Row-ordered storage for one column, plus an optional B+ tree mapping
/// cell value to row position.
///
/// The index is duplicate-free: callers (see `Table::add_row`) must
/// reject a cell that an indexed column already contains, otherwise the
/// later insert silently overwrites the earlier row position.
///
/// Note that removing a row shifts the positions of every row behind it,
/// while the index only forgets the removed value. Mixed removal and
/// lookup workloads should treat returned positions as valid only until
/// the next removal.
#[derive(Serialize, Deserialize)]
pub struct Column {
    name: String,
    dtype: DataType,
    values: Vec<Value>,
    /// Leaf capacity requested at construction; 0 means unindexed.
    /// Kept so the index can be rebuilt after deserialization.
    max_values_per_node: usize,
    #[serde(skip)]
    index: Option<BPlusTree<Value, usize>>,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("dtype", &self.dtype)
            .field("rows", &self.values.len())
            .field("indexed", &self.index.is_some())
            .finish()
    }
}

impl Column {
    /// Creates an empty column.
    ///
    /// `max_values_per_node` above 0 enables an index with branching
    /// factor `max_values_per_node + 1`; 0 leaves the column unindexed.
    pub fn new(dtype: DataType, name: impl Into<String>, max_values_per_node: usize) -> Result<Self> {
        let mut column = Self {
            name: name.into(),
            dtype,
            values: Vec::new(),
            max_values_per_node: 0,
            index: None,
        };
        column.enable_index(max_values_per_node)?;
        Ok(column)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Number of rows stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Discards any existing index and, when `max_values_per_node > 0`,
    /// rebuilds one by inserting every stored value in row order.
    pub fn enable_index(&mut self, max_values_per_node: usize) -> Result<()> {
        self.max_values_per_node = max_values_per_node;
        if max_values_per_node == 0 {
            self.index = None;
            return Ok(());
        }
        let mut index = BPlusTree::new(max_values_per_node + 1)?;
        for (row, value) in self.values.iter().enumerate() {
            index.insert(value.clone(), row);
        }
        self.index = Some(index);
        Ok(())
    }

    /// Rebuilds the index from the remembered capacity. Used after
    /// deserialization, where the index field comes back empty.
    pub(crate) fn rebuild_index(&mut self) -> Result<()> {
        self.enable_index(self.max_values_per_node)
    }

    /// Appends a value, indexing it under the new row position.
    pub fn push(&mut self, value: Value) {
        let row = self.values.len();
        if let Some(index) = &mut self.index {
            index.insert(value.clone(), row);
        }
        self.values.push(value);
    }

    /// Removes the value at `row`, dropping it from the index as well.
    pub fn remove_at(&mut self, row: usize) {
        if row >= self.values.len() {
            return;
        }
        let old = self.values.remove(row);
        if let Some(index) = &mut self.index {
            index.delete(&old);
        }
    }

    /// Replaces the value at `row`, keeping the index in step.
    pub fn update(&mut self, row: usize, value: Value) {
        if row >= self.values.len() {
            return;
        }
        let old = std::mem::replace(&mut self.values[row], value.clone());
        if let Some(index) = &mut self.index {
            index.delete(&old);
            index.insert(value, row);
        }
    }

    /// Row position of `value`: a tree descent when indexed, a linear
    /// scan otherwise.
    pub fn find(&self, value: &Value) -> Option<usize> {
        match &self.index {
            Some(index) => index.search(value).copied(),
            None => self.values.iter().position(|v| v == value),
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.find(value).is_some()
    }

    /// Wipes all rows but keeps the schema; an indexed column gets a
    /// fresh empty index at the same capacity.
    pub fn clear(&mut self) {
        self.values.clear();
        // Rebuilding over empty storage cannot fail: the capacity was
        // validated when the index was first enabled.
        let _ = self.rebuild_index();
    }
}
