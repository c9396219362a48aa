//! Typed cell values for Tessera columns.
//!
//! Every cell in a column holds a [`Value`]; the column's declared
//! [`DataType`] constrains which variant is allowed. Values carry a total
//! order so they can serve as index keys: ordering is deterministic across
//! variants (Bool < Int < Float < Text) and floats use `total_cmp`, so even
//! NaN sorts consistently.

use crate::error::{Result, TesseraError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Identifier for the data types a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int,
    Float,
    Text,
}

impl DataType {
    /// Parses a type name as written in CSV headers.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "BOOL" => Ok(DataType::Bool),
            "INT" => Ok(DataType::Int),
            "FLOAT" => Ok(DataType::Float),
            "TEXT" => Ok(DataType::Text),
            other => Err(TesseraError::UnknownDataType(other.to_string())),
        }
    }

    /// Default cell value for this type, used to pad columns added to a
    /// table that already has rows.
    pub fn default_value(&self) -> Value {
        match self {
            DataType::Bool => Value::Bool(false),
            DataType::Int => Value::Int(0),
            DataType::Float => Value::Float(0.0),
            DataType::Text => Value::Text(String::new()),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Bool => "BOOL",
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::Text => "TEXT",
        };
        write!(f, "{}", name)
    }
}

/// A single cell value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Returns the data type of this value.
    pub fn dtype(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Bool,
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::Text(_) => DataType::Text,
        }
    }

    /// Parses a textual cell (CSV field, UI input) into a value of the
    /// given type.
    pub fn parse(dtype: DataType, raw: &str) -> Result<Self> {
        let parse_err = || TesseraError::ValueParse {
            dtype: dtype.to_string(),
            raw: raw.to_string(),
        };
        match dtype {
            DataType::Bool => raw.parse::<bool>().map(Value::Bool).map_err(|_| parse_err()),
            DataType::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| parse_err()),
            DataType::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| parse_err()),
            DataType::Text => Ok(Value::Text(raw.to_string())),
        }
    }

    /// Rank used to order values of different types.
    fn type_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) => 1,
            Value::Float(_) => 2,
            Value::Text(_) => 3,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_display_parse_roundtrip() {
        for dtype in [DataType::Bool, DataType::Int, DataType::Float, DataType::Text] {
            assert_eq!(DataType::parse(&dtype.to_string()).unwrap(), dtype);
        }
    }

    #[test]
    fn test_unknown_dtype() {
        let err = DataType::parse("GEOMETRY").unwrap_err();
        assert!(matches!(err, TesseraError::UnknownDataType(_)));
    }

    #[test]
    fn test_value_dtype() {
        assert_eq!(Value::Bool(true).dtype(), DataType::Bool);
        assert_eq!(Value::Int(7).dtype(), DataType::Int);
        assert_eq!(Value::Float(1.5).dtype(), DataType::Float);
        assert_eq!(Value::Text("a".into()).dtype(), DataType::Text);
    }

    #[test]
    fn test_value_parse() {
        assert_eq!(
            Value::parse(DataType::Int, "42").unwrap(),
            Value::Int(42)
        );
        assert_eq!(
            Value::parse(DataType::Bool, "true").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Value::parse(DataType::Float, "2.5").unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(
            Value::parse(DataType::Text, "hello").unwrap(),
            Value::Text("hello".to_string())
        );

        let err = Value::parse(DataType::Int, "abc").unwrap_err();
        assert!(matches!(err, TesseraError::ValueParse { .. }));
    }

    #[test]
    fn test_same_type_ordering() {
        assert!(Value::Int(-100) < Value::Int(0));
        assert!(Value::Int(0) < Value::Int(100));
        assert!(Value::Text("aaa".into()) < Value::Text("zzz".into()));
        assert!(Value::Bool(false) < Value::Bool(true));
        assert!(Value::Float(-1.0) < Value::Float(1.0));
    }

    #[test]
    fn test_cross_type_ordering() {
        // Deterministic rank: Bool < Int < Float < Text.
        let ordered = [
            Value::Bool(true),
            Value::Int(i64::MIN),
            Value::Float(f64::NEG_INFINITY),
            Value::Text(String::new()),
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should sort before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_float_total_order() {
        // total_cmp gives NaN a fixed position instead of poisoning the order.
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert!(Value::Float(f64::INFINITY) < Value::Float(f64::NAN));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Text("row".into()).to_string(), "row");
    }

    #[test]
    fn test_serde_roundtrip() {
        let original = Value::Text("hello".to_string());
        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_default_value_matches_dtype() {
        for dtype in [DataType::Bool, DataType::Int, DataType::Float, DataType::Text] {
            assert_eq!(dtype.default_value().dtype(), dtype);
        }
    }
}
