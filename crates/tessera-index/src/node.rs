//! Node variants for the B+ tree.
//!
//! A node is either routing (internal) or data-bearing (leaf). The two
//! variants form a tagged union so that split/merge logic can be
//! dispatched by exhaustive pattern matching.

use crate::arena::NodeId;

/// A tree node: internal (routing) or leaf (data-bearing).
pub(crate) enum Node<K, V> {
    Internal(InternalNode<K>),
    Leaf(LeafNode<K, V>),
}

/// Routing node: `n` separator keys and `n + 1` children.
///
/// All keys in `children[i]` are strictly below `keys[i]`; all keys in
/// `children[i + 1]` are at or above it. Each separator equals the first
/// key reachable in the leftmost leaf of the child to its right at the
/// time it was installed.
pub(crate) struct InternalNode<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeId>,
}

/// Data node: sorted keys with parallel values, chained to the next leaf
/// in key order for range scans.
pub(crate) struct LeafNode<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) values: Vec<V>,
    pub(crate) next: Option<NodeId>,
}

impl<K: Ord> InternalNode<K> {
    /// Index of the child responsible for `key`: the binary-search
    /// insertion point among the separators, shifted one right on an
    /// exact match.
    pub(crate) fn child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }
}

impl<K, V> Node<K, V> {
    /// True if this node holds more than its capacity allows.
    ///
    /// Leaves overflow past `branching_factor - 1` entries; internal
    /// nodes past `branching_factor` children.
    pub(crate) fn is_overflow(&self, branching_factor: usize) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.values.len() > branching_factor - 1,
            Node::Internal(internal) => internal.children.len() > branching_factor,
        }
    }

    /// True if this node fell below its minimum occupancy.
    ///
    /// Leaves underflow below `branching_factor / 2` entries; internal
    /// nodes below `ceil((branching_factor + 1) / 2)` children.
    pub(crate) fn is_underflow(&self, branching_factor: usize) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.values.len() < branching_factor / 2,
            Node::Internal(internal) => internal.children.len() < (branching_factor + 1).div_ceil(2),
        }
    }
}
