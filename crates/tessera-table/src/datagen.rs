//! Random row generation for seeding test tables.

use rand::Rng;
use tessera_common::{DataType, Result, Value};

use crate::column::Column;
use crate::table::Table;

const TEXT_LEN: usize = 8;
const TEXT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const INT_BOUND: i64 = 100_000_000;

/// Draws a random value of the given type.
pub fn random_value<R: Rng>(dtype: DataType, rng: &mut R) -> Value {
    match dtype {
        DataType::Bool => Value::Bool(rng.gen()),
        DataType::Int => Value::Int(rng.gen_range(0..INT_BOUND)),
        DataType::Float => Value::Float(rng.gen::<f64>()),
        DataType::Text => {
            let text: String = (0..TEXT_LEN)
                .map(|_| TEXT_ALPHABET[rng.gen_range(0..TEXT_ALPHABET.len())] as char)
                .collect();
            Value::Text(text)
        }
    }
}

/// Draws a random value for `column`, redrawing until it is absent from
/// an indexed column so the generated cell can be inserted without a
/// duplicate rejection.
pub fn generate_value<R: Rng>(column: &Column, rng: &mut R) -> Value {
    loop {
        let value = random_value(column.dtype(), rng);
        if !column.is_indexed() || !column.contains(&value) {
            return value;
        }
    }
}

/// Appends `count` random rows to `table`. Returns the number of rows
/// actually inserted; a row can still lose a duplicate race on an
/// unindexed-then-indexed mix and is simply skipped.
pub fn fill_table<R: Rng>(table: &mut Table, count: usize, rng: &mut R) -> Result<usize> {
    let mut inserted = 0;
    for _ in 0..count {
        let row: Vec<Value> = table
            .columns()
            .iter()
            .map(|column| generate_value(column, rng))
            .collect();
        if table.add_row(&row)? {
            inserted += 1;
        }
    }
    Ok(inserted)
}
