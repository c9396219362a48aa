//! Whole-table persistence as JSON.
//!
//! Column storage and schema are written out; indexes are not. `load`
//! rebuilds each column's index from its remembered capacity, so a
//! round-trip restores indexed lookups without serializing tree nodes.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tessera_common::Result;

use crate::table::Table;

/// Writes `table` to `path` as JSON.
pub fn save<P: AsRef<Path>>(path: P, table: &Table) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), table)?;
    Ok(())
}

/// Reads a table back from `path` and rebuilds every column index.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Table> {
    let file = File::open(path)?;
    let mut table: Table = serde_json::from_reader(BufReader::new(file))?;
    table.rebuild_indexes()?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use tempfile::tempdir;
    use tessera_common::{DataType, Value};

    #[test]
    fn test_save_load_roundtrip_rebuilds_index() {
        let mut table = Table::new();
        table.add_column(Column::new(DataType::Int, "id", 4).unwrap());
        table.add_column(Column::new(DataType::Text, "name", 0).unwrap());
        for i in 0..100 {
            table
                .add_row(&[Value::Int(i), Value::Text(format!("row-{}", i))])
                .unwrap();
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("table.json");
        save(&path, &table).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.num_rows(), 100);
        assert!(loaded.pk_column().unwrap().is_indexed());
        assert!(!loaded.column(1).unwrap().is_indexed());
        assert_eq!(loaded.row_index_by_pk(&Value::Int(42)), Some(42));

        // The rebuilt index must keep rejecting duplicates.
        let mut loaded = loaded;
        assert!(!loaded
            .add_row(&[Value::Int(42), Value::Text("dup".to_string())])
            .unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load(dir.path().join("nothing.json")).unwrap_err();
        assert!(matches!(err, tessera_common::TesseraError::Io(_)));
    }
}
