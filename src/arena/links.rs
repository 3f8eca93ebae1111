//! Storage of the nodes and the link surgery performed on them.
//!
//! Child slots are the only ownership edges. Every mutation of a child slot goes through
//! the methods in this file, which hand over to the propagation passes in
//! [propagation](super::propagation) so the cached metrics never go stale.

use super::node::{BinaryNode, NodeId};
use crate::Role;
use tracing::trace;

/// Slot based memory area owning all nodes of one binary tree.
///
/// Freed slots are recycled. Each slot carries a generation that is bumped on release,
/// which invalidates handles to the freed node.
#[derive(Debug)]
pub struct NodeArena<T> {
    slots: Vec<Option<BinaryNode<T>>>,
    /// Last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        NodeArena {
            slots: vec![],
            generations: vec![],
            free_list: vec![],
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            slots: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_list: vec![],
            len: 0,
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// The node behind `id`, or `None` if the handle is stale or was never issued here.
    pub fn get(&self, id: NodeId) -> Option<&BinaryNode<T>> {
        self.slots
            .get(id.index)?
            .as_ref()
            .filter(|node| node.index == id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut BinaryNode<T>> {
        self.slots
            .get_mut(id.index)?
            .as_mut()
            .filter(|node| node.index == id)
    }

    /// Access for links that are guaranteed by the tree invariants.
    pub(super) fn at(&self, id: NodeId) -> &BinaryNode<T> {
        self.get(id).expect("Internal error. Linked node is not alive!")
    }

    pub(super) fn at_mut(&mut self, id: NodeId) -> &mut BinaryNode<T> {
        self.get_mut(id).expect("Internal error. Linked node is not alive!")
    }

    /// Creates a detached leaf and returns its handle.
    pub(crate) fn alloc(&mut self, value: T, role: Role) -> NodeId {
        let index = self.free_list.pop().unwrap_or_else(|| {
            self.slots.push(None);
            self.generations.push(0);
            self.slots.len() - 1
        });
        let id = NodeId {
            index,
            generation: self.generations[index],
        };
        self.slots[index] = Some(BinaryNode::new(value, id, role));
        self.len += 1;
        id
    }

    /// Frees a single slot. Links from or to the node are left untouched.
    fn release(&mut self, id: NodeId) -> Option<BinaryNode<T>> {
        if !self.contains(id) {
            return None;
        }
        let node = self.slots[id.index].take();
        self.generations[id.index] = self.generations[id.index].wrapping_add(1);
        self.free_list.push(id.index);
        self.len -= 1;
        node
    }

    /// Drops every node and invalidates all handles.
    pub(crate) fn clear(&mut self) {
        for index in 0..self.slots.len() {
            if self.slots[index].take().is_some() {
                self.generations[index] = self.generations[index].wrapping_add(1);
                self.free_list.push(index);
            }
        }
        self.len = 0;
    }

    /// Frees `id` and everything below it. The parent's child slot is not reset.
    fn destroy_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.release(current) {
                stack.extend(node.children());
            }
        }
    }

    /// The other child of the node's parent. `None` for the root or a missing sibling.
    pub fn get_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        let parent = self.at(node.parent?);
        match node.role {
            Role::LeftChild => parent.right,
            Role::RightChild => parent.left,
            Role::Root => None,
        }
    }

    pub(crate) fn insert_left_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, child, Role::LeftChild);
    }

    pub(crate) fn insert_right_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, child, Role::RightChild);
    }

    /// Grafts the detached subtree rooted at `child` into the slot of `parent` named by `role`.
    ///
    /// A subtree already occupying the slot is destroyed. Afterwards size, depth and height are
    /// correct for every node of the tree.
    pub(crate) fn insert_child(&mut self, parent: NodeId, child: NodeId, role: Role) {
        if let Some(previous) = self.at(parent).child(role) {
            trace!("Replacing subtree {previous} below {parent}");
            self.destroy_subtree(previous);
        }
        match self.at_mut(parent).child_mut(role) {
            Some(slot) => *slot = Some(child),
            None => return,
        }
        let node = self.at_mut(child);
        node.role = role;
        node.parent = Some(parent);

        self.update_size(parent);
        self.update_ancestor_size(parent);

        self.update_depth(child);
        self.update_descendant_depth(child);

        self.update_ancestor_height(child);
    }

    /// Destroys all descendants and turns the node into a leaf. Ancestors are not updated.
    pub(crate) fn clear_descendant(&mut self, id: NodeId) {
        let node = self.at_mut(id);
        let (left, right) = (node.left.take(), node.right.take());
        node.size = 1;
        node.height = 0;
        left.into_iter()
            .chain(right)
            .for_each(|child| self.destroy_subtree(child));
    }

    /// Unlinks the node from its parent and makes it a root. Returns the former parent.
    /// No metric is updated.
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.at_mut(id);
        let parent = node.parent.take()?;
        let role = std::mem::replace(&mut node.role, Role::Root);
        if let Some(slot) = self.at_mut(parent).child_mut(role) {
            *slot = None;
        }
        Some(parent)
    }

    /// Detaches the node and frees it together with its descendants. Returns the former parent.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.detach(id);
        self.destroy_subtree(id);
        parent
    }

    /// Moves the subtree rooted at `root` out of `other` into this arena. Values are moved,
    /// cached metrics are carried over. Returns the new handle of the (now detached) root.
    pub(crate) fn adopt(&mut self, mut other: NodeArena<T>, root: NodeId) -> NodeId {
        self.transplant(&mut other, root)
    }

    /// Moves the detached subtree rooted at `root` into a fresh arena.
    pub(crate) fn extract(&mut self, root: NodeId) -> (NodeArena<T>, NodeId) {
        let mut arena = NodeArena::with_capacity(self.at(root).size);
        let root = arena.transplant(self, root);
        (arena, root)
    }

    fn transplant(&mut self, source: &mut NodeArena<T>, root: NodeId) -> NodeId {
        let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(root, None)];
        let mut new_root = None;

        while let Some((old, parent)) = stack.pop() {
            let Some(node) = source.release(old) else {
                continue;
            };
            let role = if parent.is_some() { node.role } else { Role::Root };
            let id = self.alloc(node.value, role);
            let moved = self.at_mut(id);
            moved.size = node.size;
            moved.height = node.height;
            moved.depth = node.depth;
            moved.parent = parent;

            match parent {
                Some(parent) => {
                    if let Some(slot) = self.at_mut(parent).child_mut(role) {
                        *slot = Some(id);
                    }
                }
                None => new_root = Some(id),
            }
            stack.extend(node.left.map(|child| (child, Some(id))));
            stack.extend(node.right.map(|child| (child, Some(id))));
        }
        new_root.expect("Internal error. Transplanted subtree has no root!")
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Nodelike;
    use test_log;

    //     0
    //    / \
    //   1   2
    //   |
    //   3
    fn small_arena() -> (NodeArena<i32>, [NodeId; 4]) {
        let mut arena = NodeArena::new();
        let root = arena.alloc(0, Role::Root);
        let first = arena.alloc(1, Role::Root);
        let second = arena.alloc(2, Role::Root);
        let third = arena.alloc(3, Role::Root);
        arena.insert_left_child(root, first);
        arena.insert_right_child(root, second);
        arena.insert_left_child(first, third);
        (arena, [root, first, second, third])
    }

    #[test_log::test]
    fn test_insertion_updates_metrics() {
        let (arena, [root, first, second, third]) = small_arena();

        assert_eq!(arena.len(), 4);
        assert_eq!(arena.at(root).size(), 4);
        assert_eq!(arena.at(root).height(), 2);
        assert_eq!(arena.at(first).size(), 2);
        assert_eq!(arena.at(first).height(), 1);
        assert_eq!(arena.at(second).height(), 0);
        assert_eq!(arena.at(third).depth(), 2);

        assert_eq!(arena.at(first).role(), Role::LeftChild);
        assert_eq!(arena.at(second).role(), Role::RightChild);
        assert_eq!(arena.at(third).parent(), Some(first));
    }

    #[test_log::test]
    fn test_insert_replaces_existing_child() {
        let (mut arena, [root, first, _, third]) = small_arena();
        let replacement = arena.alloc(9, Role::Root);
        arena.insert_left_child(root, replacement);

        assert!(!arena.contains(first));
        assert!(!arena.contains(third));
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.at(root).size(), 3);
        assert_eq!(arena.at(root).height(), 1);
        assert_eq!(arena.at(replacement).depth(), 1);
    }

    #[test_log::test]
    fn test_sibling() {
        let (arena, [root, first, second, third]) = small_arena();

        assert_eq!(arena.get_sibling(first), Some(second));
        assert_eq!(arena.get_sibling(second), Some(first));
        assert_eq!(arena.get_sibling(third), None);
        assert_eq!(arena.get_sibling(root), None);
    }

    #[test_log::test]
    fn test_clear_descendant_leaves_ancestors() {
        let (mut arena, [root, first, _, third]) = small_arena();
        arena.clear_descendant(first);

        assert!(!arena.contains(third));
        assert!(arena.at(first).is_leaf());
        assert_eq!(arena.at(first).size(), 1);
        assert_eq!(arena.at(first).height(), 0);
        // Callers are responsible for the ancestors
        assert_eq!(arena.at(root).size(), 4);
        assert_eq!(arena.at(root).height(), 2);
    }

    #[test_log::test]
    fn test_stale_handles_are_rejected() {
        let (mut arena, [_, first, _, third]) = small_arena();
        arena.remove(first);

        assert!(arena.get(third).is_none());
        let reused = arena.alloc(7, Role::Root);
        // The slot is recycled but old handles must not alias the new node
        assert!(reused.index == first.index || reused.index == third.index);
        assert!(arena.get(first).is_none());
        assert!(arena.get(third).is_none());
        assert_eq!(*arena.at(reused).get(), 7);
    }

    #[test_log::test]
    fn test_extract_and_adopt() {
        let (mut arena, [root, first, _, _]) = small_arena();
        arena.detach(first);
        let (extracted, moved_root) = arena.extract(first);

        assert_eq!(arena.len(), 2);
        assert_eq!(extracted.len(), 2);
        assert_eq!(*extracted.at(moved_root).get(), 1);
        assert!(extracted.at(moved_root).is_root());
        assert_eq!(extracted.at(moved_root).size(), 2);

        let adopted = arena.adopt(extracted, moved_root);
        arena.insert_left_child(root, adopted);
        assert_eq!(arena.len(), 4);
        assert_eq!(arena.at(root).size(), 4);
        assert_eq!(arena.at(root).height(), 2);
        assert_eq!(arena.at(adopted).depth(), 1);
    }
}
