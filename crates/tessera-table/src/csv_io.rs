//! CSV import and export.
//!
//! The dialect carries the schema in the first two records: record 1 is
//! the column names, record 2 the column type names (`BOOL`, `INT`,
//! `FLOAT`, `TEXT`), and every following record is one data row.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tessera_common::{DataType, Result, TesseraError, Value};

use crate::column::Column;
use crate::table::Table;

/// Writes `table` to `path` in the two-header-record dialect.
pub fn export<P: AsRef<Path>>(path: P, table: &Table) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;

    writer.write_record(table.columns().iter().map(|c| c.name()))?;
    writer.write_record(table.columns().iter().map(|c| c.dtype().to_string()))?;

    for i in 0..table.num_rows() {
        writer.write_record(
            table
                .columns()
                .iter()
                .map(|c| c.value_at(i).map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Reads a table from `path`. Imported columns are unindexed; callers
/// enable indexing per column afterwards.
pub fn import<P: AsRef<Path>>(path: P) -> Result<Table> {
    // Record lengths are validated here, against the schema records,
    // so the reader itself accepts ragged input.
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut records = reader.records();

    let names = records
        .next()
        .ok_or_else(|| TesseraError::InvalidFormat("missing column name record".to_string()))??;
    let types = records
        .next()
        .ok_or_else(|| TesseraError::InvalidFormat("missing column type record".to_string()))??;
    if names.len() != types.len() {
        return Err(TesseraError::InvalidFormat(format!(
            "{} column names but {} column types",
            names.len(),
            types.len()
        )));
    }

    let mut table = Table::new();
    for (name, type_name) in names.iter().zip(types.iter()) {
        let dtype = DataType::parse(type_name)?;
        table.push_column_unchecked(Column::new(dtype, name, 0)?);
    }

    let dtypes: Vec<DataType> = table.columns().iter().map(|c| c.dtype()).collect();
    for record in records {
        let record = record?;
        if record.len() != dtypes.len() {
            return Err(TesseraError::InvalidFormat(format!(
                "row has {} fields, schema has {} columns",
                record.len(),
                dtypes.len()
            )));
        }
        let row: Vec<Value> = record
            .iter()
            .zip(&dtypes)
            .map(|(field, &dtype)| Value::parse(dtype, field))
            .collect::<Result<_>>()?;
        table.add_row(&row)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample_table() -> Table {
        let mut table = Table::new();
        table.add_column(Column::new(DataType::Int, "id", 0).unwrap());
        table.add_column(Column::new(DataType::Text, "name", 0).unwrap());
        table
            .add_row(&[Value::Int(1), Value::Text("ada".to_string())])
            .unwrap();
        table
            .add_row(&[Value::Int(2), Value::Text("bob".to_string())])
            .unwrap();
        table
    }

    #[test]
    fn test_export_import_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");

        export(&path, &sample_table()).unwrap();
        let loaded = import(&path).unwrap();

        assert_eq!(loaded.num_columns(), 2);
        assert_eq!(loaded.num_rows(), 2);
        assert_eq!(
            loaded.row_by_pk(&Value::Int(2)).unwrap()[1],
            Value::Text("bob".to_string())
        );
    }

    #[test]
    fn test_import_rejects_unknown_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "id").unwrap();
        writeln!(f, "GEOMETRY").unwrap();
        drop(f);

        let err = import(&path).unwrap_err();
        assert!(matches!(err, TesseraError::UnknownDataType(_)));
    }

    #[test]
    fn test_import_rejects_header_length_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "id,name").unwrap();
        writeln!(f, "INT").unwrap();
        drop(f);

        let err = import(&path).unwrap_err();
        assert!(matches!(err, TesseraError::InvalidFormat(_)));
    }

    #[test]
    fn test_import_rejects_unparsable_cell() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "id").unwrap();
        writeln!(f, "INT").unwrap();
        writeln!(f, "not-a-number").unwrap();
        drop(f);

        let err = import(&path).unwrap_err();
        assert!(matches!(err, TesseraError::ValueParse { .. }));
    }

    #[test]
    fn test_import_missing_type_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "id,name").unwrap();
        drop(f);

        let err = import(&path).unwrap_err();
        assert!(matches!(err, TesseraError::InvalidFormat(_)));
    }
}
