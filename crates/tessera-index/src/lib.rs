//! Ordered B+ tree index for Tessera.
//!
//! This crate provides [`BPlusTree`], the in-memory balanced multiway
//! search tree behind indexed columns: point lookup, insert with
//! overwrite-on-duplicate, delete with parent-driven rebalancing, and
//! sorted range scans over a linked leaf chain.
//!
//! ## Structure
//!
//! Nodes live in a slab arena and reference each other by arena handle;
//! the arena is the single owner of every node, so the horizontal
//! next-leaf link is structurally non-owning:
//!
//! ```text
//!                    +----------------+
//!                    | Internal       |
//!                    | keys: [k]      |
//!                    | children: ids  |
//!                    +----------------+
//!                      /            \
//!           +--------------+    +--------------+
//!           | Leaf         |    | Leaf         |
//!           | keys/values  |--->| keys/values  |---> ...
//!           | next ----------^  | next         |
//!           +--------------+    +--------------+
//! ```
//!
//! All leaves sit at the same depth; walking the leaf chain from the
//! leftmost leaf yields every entry in strictly ascending key order.
//!
//! ## Rebalancing discipline
//!
//! Structural repair always happens one level up: after a recursive
//! insert or delete returns, the parent checks the child for overflow or
//! underflow and splits or merges it locally. Root promotion (height
//! growth) and root demotion (height shrink) are handled at the tree
//! level, so a caller never observes a half-updated root.

mod arena;
mod node;
mod tree;

pub use tree::{BPlusTree, RangePolicy};
