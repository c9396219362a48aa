//! Tessera common types, errors, and utilities.
//!
//! This crate provides shared definitions used across all Tessera components.

pub mod error;
pub mod value;

pub use error::{Result, TesseraError};
pub use value::{DataType, Value};
