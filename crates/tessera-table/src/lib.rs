//! Column-store bookkeeping on top of the Tessera index.
//!
//! A [`Table`] is a set of typed [`Column`]s sharing row positions, with
//! column 0 acting as the primary key. Each column optionally maintains a
//! B+ tree from cell value to row position, turning value lookups from a
//! linear scan into a tree descent.
//!
//! The crate also ships the surrounding plumbing:
//! - [`csv_io`]: import/export in a two-header-line CSV dialect
//!   (column names, then column types, then data rows)
//! - [`persist`]: whole-table JSON save/load; indexes are not written
//!   out and are rebuilt from column storage on load
//! - [`datagen`]: random row generation for seeding test tables

pub mod column;
pub mod csv_io;
pub mod datagen;
pub mod persist;
pub mod table;

pub use column::Column;
pub use table::Table;
