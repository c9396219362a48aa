//! Slab-based memory arena for B+ tree nodes.
//!
//! Nodes are addressed by [`NodeId`] rather than owning pointers, which
//! gives every node exactly one owner (the arena) while still allowing
//! the non-owning horizontal leaf chain.

use crate::node::Node;

/// Handle to a node stored in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Slab allocator for tree nodes with slot reuse.
///
/// Freed slots go on a free list and are handed out again before the
/// slab grows, so long insert/delete workloads do not leak slots.
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<u32>,
}

impl<K, V> NodeArena<K, V> {
    /// Creates an empty arena.
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Stores a node and returns its handle.
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(node);
                NodeId(slot)
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Some(node));
                NodeId(slot)
            }
        }
    }

    /// Removes a node from the arena and returns it, recycling the slot.
    pub(crate) fn remove(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots[id.index()]
            .take()
            .expect("node removed after free");
        self.free.push(id.0);
        node
    }

    /// Drops a node, recycling its slot.
    pub(crate) fn free(&mut self, id: NodeId) {
        self.remove(id);
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K, V> {
        self.slots[id.index()].as_ref().expect("node accessed after free")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.slots[id.index()].as_mut().expect("node accessed after free")
    }

    /// Number of live nodes (allocated and not freed).
    pub(crate) fn live_nodes(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{LeafNode, Node};

    fn leaf(key: i32) -> Node<i32, i32> {
        Node::Leaf(LeafNode {
            keys: vec![key],
            values: vec![key],
            next: None,
        })
    }

    #[test]
    fn test_alloc_and_get() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(leaf(1));
        let b = arena.alloc(leaf(2));
        assert_ne!(a, b);
        assert_eq!(arena.live_nodes(), 2);

        match arena.get(a) {
            Node::Leaf(l) => assert_eq!(l.keys, vec![1]),
            Node::Internal(_) => panic!("expected leaf"),
        }
    }

    #[test]
    fn test_slot_reuse_after_free() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(leaf(1));
        let _b = arena.alloc(leaf(2));
        arena.free(a);
        assert_eq!(arena.live_nodes(), 1);

        let c = arena.alloc(leaf(3));
        assert_eq!(a, c, "freed slot should be reused");
        assert_eq!(arena.live_nodes(), 2);
    }

    #[test]
    fn test_remove_returns_node() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(leaf(7));
        match arena.remove(a) {
            Node::Leaf(l) => assert_eq!(l.keys, vec![7]),
            Node::Internal(_) => panic!("expected leaf"),
        }
        assert_eq!(arena.live_nodes(), 0);
    }
}
