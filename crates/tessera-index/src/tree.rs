//! The B+ tree: lookup, mutation, and rebalancing.

use crate::arena::{NodeArena, NodeId};
use crate::node::{InternalNode, LeafNode, Node};
use tessera_common::{Result, TesseraError};

/// Whether a range bound includes or excludes the bound key itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    Inclusive,
    Exclusive,
}

/// Ordered key/value index with amortized logarithmic operations.
///
/// Keys are globally unique: inserting an existing key overwrites its
/// value in place. Deleting an absent key is a silent no-op. All
/// operations run to completion on the caller's thread; the tree is not
/// safe for concurrent mutation.
pub struct BPlusTree<K, V> {
    /// Fan-out bound, fixed at construction. A leaf holds at most
    /// `branching_factor - 1` entries; an internal node at most
    /// `branching_factor` children.
    branching_factor: usize,
    root: NodeId,
    arena: NodeArena<K, V>,
}

impl<K: Ord + Clone, V: Clone> BPlusTree<K, V> {
    /// Creates an empty tree with the given branching factor.
    ///
    /// Fails immediately for factors of 2 or below; no tree is created.
    pub fn new(branching_factor: usize) -> Result<Self> {
        if branching_factor <= 2 {
            return Err(TesseraError::InvalidBranchingFactor(branching_factor));
        }
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::Leaf(LeafNode {
            keys: Vec::new(),
            values: Vec::new(),
            next: None,
        }));
        Ok(Self {
            branching_factor,
            root,
            arena,
        })
    }

    /// Returns the configured branching factor.
    pub fn branching_factor(&self) -> usize {
        self.branching_factor
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the value paired with `key`, or `None` if absent.
    pub fn search(&self, key: &K) -> Option<&V> {
        let mut node = self.root;
        loop {
            match self.arena.get(node) {
                Node::Internal(internal) => {
                    node = internal.children[internal.child_index(key)];
                }
                Node::Leaf(leaf) => {
                    return match leaf.keys.binary_search(key) {
                        Ok(i) => Some(&leaf.values[i]),
                        Err(_) => None,
                    };
                }
            }
        }
    }

    /// Collects the values for all keys between `low` and `high`, in
    /// ascending key order, honoring each bound's policy independently.
    ///
    /// Inverted bounds (`low > high`) yield an empty vec.
    pub fn range(
        &self,
        low: &K,
        low_policy: RangePolicy,
        high: &K,
        high_policy: RangePolicy,
    ) -> Vec<V> {
        let mut node = self.root;
        let start = loop {
            match self.arena.get(node) {
                Node::Internal(internal) => {
                    node = internal.children[internal.child_index(low)];
                }
                Node::Leaf(_) => break node,
            }
        };

        let mut out = Vec::new();
        let mut current = Some(start);
        while let Some(id) = current {
            let Node::Leaf(leaf) = self.arena.get(id) else {
                unreachable!("leaf chain reached an internal node")
            };
            for (key, value) in leaf.keys.iter().zip(&leaf.values) {
                let above_low = match low_policy {
                    RangePolicy::Inclusive => key >= low,
                    RangePolicy::Exclusive => key > low,
                };
                let below_high = match high_policy {
                    RangePolicy::Inclusive => key <= high,
                    RangePolicy::Exclusive => key < high,
                };
                if above_low && below_high {
                    out.push(value.clone());
                } else {
                    // The chain is sorted: once a key passes the upper
                    // bound no later key can come back under it.
                    let past_high = match high_policy {
                        RangePolicy::Inclusive => key > high,
                        RangePolicy::Exclusive => key >= high,
                    };
                    if past_high {
                        return out;
                    }
                }
            }
            current = leaf.next;
        }
        out
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Inserts `key -> value`, overwriting in place if the key exists.
    ///
    /// A full leaf splits and propagates a separator upward; if the
    /// split reaches the top the root is promoted and the tree grows by
    /// exactly one level.
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_into(self.root, key, value);

        if self.arena.get(self.root).is_overflow(self.branching_factor) {
            let sibling = self.split(self.root);
            let separator = self.first_leaf_key(sibling);
            let old_root = self.root;
            self.root = self.arena.alloc(Node::Internal(InternalNode {
                keys: vec![separator],
                children: vec![old_root, sibling],
            }));
        }
    }

    /// Removes `key` and its value; silently does nothing if absent.
    ///
    /// An underflowing leaf is merged by its parent with the left
    /// sibling when one exists, else the right; a merge that overflows
    /// is immediately re-split. If the repair chain empties the root's
    /// key set, the root is demoted to its sole remaining child.
    pub fn delete(&mut self, key: &K) {
        self.delete_from(self.root, key);

        let demoted = match self.arena.get(self.root) {
            Node::Internal(internal) if internal.keys.is_empty() => Some(internal.children[0]),
            _ => None,
        };
        if let Some(child) = demoted {
            let old_root = self.root;
            self.root = child;
            self.arena.free(old_root);
        }
    }

    fn insert_into(&mut self, node: NodeId, key: K, value: V) {
        let child = match self.arena.get_mut(node) {
            Node::Leaf(leaf) => {
                match leaf.keys.binary_search(&key) {
                    Ok(i) => leaf.values[i] = value,
                    Err(i) => {
                        leaf.keys.insert(i, key);
                        leaf.values.insert(i, value);
                    }
                }
                return;
            }
            Node::Internal(internal) => internal.children[internal.child_index(&key)],
        };

        self.insert_into(child, key, value);

        if self.arena.get(child).is_overflow(self.branching_factor) {
            let sibling = self.split(child);
            let separator = self.first_leaf_key(sibling);
            self.insert_child(node, separator, sibling);
        }
    }

    fn delete_from(&mut self, node: NodeId, key: &K) {
        let (child, child_idx) = match self.arena.get_mut(node) {
            Node::Leaf(leaf) => {
                if let Ok(i) = leaf.keys.binary_search(key) {
                    leaf.keys.remove(i);
                    leaf.values.remove(i);
                }
                return;
            }
            Node::Internal(internal) => {
                let idx = internal.child_index(key);
                (internal.children[idx], idx)
            }
        };

        self.delete_from(child, key);

        // Repair happens one level up: the parent checks the child after
        // the recursive call returns, whether or not anything was removed.
        if !self.arena.get(child).is_underflow(self.branching_factor) {
            return;
        }

        let (left_idx, right_idx) = {
            let Node::Internal(internal) = self.arena.get(node) else {
                unreachable!("descended through a leaf")
            };
            if internal.children.len() < 2 {
                // No sibling to merge with; the level above repairs this.
                return;
            }
            // Prefer the left sibling when one exists.
            if child_idx > 0 {
                (child_idx - 1, child_idx)
            } else {
                (child_idx, child_idx + 1)
            }
        };

        self.merge_children(node, left_idx, right_idx);

        // Two nodes each just under capacity can merge into one over it.
        let merged = {
            let Node::Internal(internal) = self.arena.get(node) else {
                unreachable!("descended through a leaf")
            };
            internal.children[left_idx]
        };
        if self.arena.get(merged).is_overflow(self.branching_factor) {
            let sibling = self.split(merged);
            let separator = self.first_leaf_key(sibling);
            self.insert_child(node, separator, sibling);
        }
    }

    // =========================================================================
    // Split / merge
    // =========================================================================

    /// Splits an overflowing node, returning the new right sibling.
    ///
    /// A leaf moves its upper half (`ceil(n / 2)` onward) into the
    /// sibling and splices it into the leaf chain. An internal node
    /// moves everything past `n / 2 + 1` and promotes the boundary key
    /// out of both halves; the caller reinstalls a separator computed
    /// from the sibling's first reachable leaf key.
    fn split(&mut self, node: NodeId) -> NodeId {
        let sibling_node = match self.arena.get_mut(node) {
            Node::Leaf(leaf) => {
                let from = (leaf.keys.len() + 1) / 2;
                Node::Leaf(LeafNode {
                    keys: leaf.keys.split_off(from),
                    values: leaf.values.split_off(from),
                    next: leaf.next,
                })
            }
            Node::Internal(internal) => {
                let from = internal.keys.len() / 2 + 1;
                let keys = internal.keys.split_off(from);
                internal.keys.pop();
                Node::Internal(InternalNode {
                    keys,
                    children: internal.children.split_off(from),
                })
            }
        };

        let sibling = self.arena.alloc(sibling_node);
        if let Node::Leaf(leaf) = self.arena.get_mut(node) {
            leaf.next = Some(sibling);
        }
        sibling
    }

    /// Merges `children[right_idx]` into `children[left_idx]` of
    /// `parent` and removes the separator that pointed at the discarded
    /// right child.
    fn merge_children(&mut self, parent: NodeId, left_idx: usize, right_idx: usize) {
        let (left_id, right_id) = {
            let Node::Internal(internal) = self.arena.get(parent) else {
                unreachable!("merge driven by a leaf")
            };
            (internal.children[left_idx], internal.children[right_idx])
        };

        // An internal merge reinstates the right side's first reachable
        // leaf key as the separator between the two key runs.
        let reinstated = match self.arena.get(right_id) {
            Node::Internal(_) => Some(self.first_leaf_key(right_id)),
            Node::Leaf(_) => None,
        };

        let right = self.arena.remove(right_id);
        match (self.arena.get_mut(left_id), right) {
            (Node::Leaf(left), Node::Leaf(mut right)) => {
                left.keys.append(&mut right.keys);
                left.values.append(&mut right.values);
                left.next = right.next;
            }
            (Node::Internal(left), Node::Internal(mut right)) => {
                if let Some(separator) = reinstated {
                    left.keys.push(separator);
                }
                left.keys.append(&mut right.keys);
                left.children.append(&mut right.children);
            }
            _ => unreachable!("siblings of different kinds"),
        }

        let Node::Internal(internal) = self.arena.get_mut(parent) else {
            unreachable!("merge driven by a leaf")
        };
        internal.keys.remove(left_idx);
        internal.children.remove(right_idx);
    }

    /// Installs `child` under `node` with `key` as its separator. An
    /// existing equal separator has its right child replaced instead.
    fn insert_child(&mut self, node: NodeId, key: K, child: NodeId) {
        let Node::Internal(internal) = self.arena.get_mut(node) else {
            unreachable!("separator installed into a leaf")
        };
        match internal.keys.binary_search(&key) {
            Ok(i) => internal.children[i + 1] = child,
            Err(i) => {
                internal.keys.insert(i, key);
                internal.children.insert(i + 1, child);
            }
        }
    }

    /// First key of the leftmost leaf reachable from `node`.
    fn first_leaf_key(&self, node: NodeId) -> K {
        let mut current = node;
        loop {
            match self.arena.get(current) {
                Node::Internal(internal) => current = internal.children[0],
                Node::Leaf(leaf) => return leaf.keys[0].clone(),
            }
        }
    }

    fn first_leaf(&self) -> NodeId {
        let mut node = self.root;
        loop {
            match self.arena.get(node) {
                Node::Internal(internal) => node = internal.children[0],
                Node::Leaf(_) => return node,
            }
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Number of distinct keys in the tree.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut current = Some(self.first_leaf());
        while let Some(id) = current {
            let Node::Leaf(leaf) = self.arena.get(id) else {
                unreachable!("leaf chain reached an internal node")
            };
            count += leaf.keys.len();
            current = leaf.next;
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tree height: 1 when the root is itself a leaf.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = self.root;
        while let Node::Internal(internal) = self.arena.get(node) {
            node = internal.children[0];
            height += 1;
        }
        height
    }

    /// All entries in ascending key order, read off the leaf chain.
    pub fn entries(&self) -> Vec<(K, V)> {
        let mut out = Vec::new();
        let mut current = Some(self.first_leaf());
        while let Some(id) = current {
            let Node::Leaf(leaf) = self.arena.get(id) else {
                unreachable!("leaf chain reached an internal node")
            };
            out.extend(leaf.keys.iter().cloned().zip(leaf.values.iter().cloned()));
            current = leaf.next;
        }
        out
    }

    /// Number of live nodes in the arena, for diagnostics.
    pub fn node_count(&self) -> usize {
        self.arena.live_nodes()
    }

    /// Panics if a structural invariant is violated. Intended for tests
    /// and debugging.
    ///
    /// Checks that every leaf sits at the same depth, that each internal
    /// node has one more child than keys, and that the leaf chain yields
    /// every reachable key exactly once in strictly ascending order.
    pub fn assert_invariants(&self) {
        let mut depths = Vec::new();
        let mut reachable = 0usize;
        self.collect_leaves(self.root, 1, &mut depths, &mut reachable);

        let first = depths[0];
        assert!(
            depths.iter().all(|&d| d == first),
            "leaves at unequal depths: {:?}",
            depths
        );

        let entries = self.entries();
        assert_eq!(
            entries.len(),
            reachable,
            "leaf chain length disagrees with top-down key count"
        );
        for pair in entries.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "leaf chain is not strictly ascending"
            );
        }
    }

    fn collect_leaves(
        &self,
        node: NodeId,
        depth: usize,
        depths: &mut Vec<usize>,
        reachable: &mut usize,
    ) {
        match self.arena.get(node) {
            Node::Internal(internal) => {
                assert_eq!(
                    internal.children.len(),
                    internal.keys.len() + 1,
                    "internal node child/key count mismatch"
                );
                for &child in &internal.children {
                    self.collect_leaves(child, depth + 1, depths, reachable);
                }
            }
            Node::Leaf(leaf) => {
                assert_eq!(
                    leaf.keys.len(),
                    leaf.values.len(),
                    "leaf key/value count mismatch"
                );
                depths.push(depth);
                *reachable += leaf.keys.len();
            }
        }
    }
}
