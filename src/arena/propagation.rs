//! Incremental maintenance of the cached node metrics.
//!
//! * Size only ever changes along the path from an edit to the root, so it is pushed upwards
//!   unconditionally.
//! * Height is defined from the leaves. Propagation starts at a node whose height is known
//!   and climbs until an ancestor's recomputed height matches its cache. Since that ancestor
//!   did not change, neither can any `max` above it.
//! * Depth is defined from the root and is pushed downwards through a grafted subtree.

use super::{node::NodeId, NodeArena};
use tracing::trace;

impl<T> NodeArena<T> {
    /// Recomputes the node's size from its children and returns it.
    pub(crate) fn update_size(&mut self, id: NodeId) -> usize {
        let node = self.at(id);
        let size = 1 + node.children().map(|child| self.at(child).size).sum::<usize>();
        self.at_mut(id).size = size;
        size
    }

    /// Recomputes the node's height from its children and returns it. Absent children count
    /// as height `-1`, so a childless node ends up at 0.
    pub(crate) fn update_height_from_child(&mut self, id: NodeId) -> usize {
        let node = self.at(id);
        let height = node
            .children()
            .map(|child| self.at(child).height + 1)
            .max()
            .unwrap_or(0);
        self.at_mut(id).height = height;
        height
    }

    /// Sets the node's height to one less than its parent's and returns it.
    ///
    /// Only valid while walking down from a parent whose height is correct, along a child on
    /// the parent's tallest path. A root keeps its height.
    #[allow(dead_code)]
    pub(crate) fn update_height_from_parent(&mut self, id: NodeId) -> usize {
        let node = self.at(id);
        let height = match node.parent {
            Some(parent) => self.at(parent).height.saturating_sub(1),
            None => node.height,
        };
        self.at_mut(id).height = height;
        height
    }

    /// Recomputes the node's depth from its parent. Roots have depth 0.
    pub(crate) fn update_depth(&mut self, id: NodeId) -> usize {
        let depth = self.at(id).parent.map_or(0, |parent| self.at(parent).depth + 1);
        self.at_mut(id).depth = depth;
        depth
    }

    /// Pushes size changes from the node's parent up to the root. There is no early exit,
    /// a structural edit below always changes every ancestor.
    pub(crate) fn update_ancestor_size(&mut self, id: NodeId) {
        let mut current = self.at(id).parent;
        while let Some(ancestor) = current {
            self.update_size(ancestor);
            current = self.at(ancestor).parent;
        }
    }

    /// Re-derives the depth of every descendant from its (already correct) parent.
    pub(crate) fn update_descendant_depth(&mut self, id: NodeId) {
        let mut stack = self.at(id).children().collect::<Vec<_>>();
        while let Some(current) = stack.pop() {
            self.update_depth(current);
            stack.extend(self.at(current).children());
        }
    }

    /// Climbs from a node with a correct height towards the root, recomputing every
    /// ancestor's height and stopping at the first one that did not change.
    pub(crate) fn update_ancestor_height(&mut self, id: NodeId) {
        self.propagate_height(id, None);
    }

    /// Like [update_ancestor_height](Self::update_ancestor_height), but starts at `anchor`, a
    /// leaf below `edit_point`. The nodes between the two were not touched by the edit and
    /// recompute to their cached values, so the early exit only arms once `edit_point` has been
    /// recomputed.
    pub(crate) fn update_ancestor_height_through(&mut self, anchor: NodeId, edit_point: NodeId) {
        self.propagate_height(anchor, Some(edit_point));
    }

    fn propagate_height(&mut self, start: NodeId, mut pending: Option<NodeId>) {
        if pending == Some(start) {
            pending = None;
        }
        self.refresh_sibling_height(start);

        let mut current = start;
        while let Some(ancestor) = self.at(current).parent {
            let cached = self.at(ancestor).height;
            let height = self.update_height_from_child(ancestor);
            if pending == Some(ancestor) {
                pending = None;
            } else if pending.is_none() && height == cached {
                trace!("Height propagation stopped at {ancestor} (height {height})");
                return;
            }
            self.refresh_sibling_height(ancestor);
            current = ancestor;
        }
    }

    /// A parent's height is the `max` over both children, so the sibling's cached height has
    /// to be current before the parent is recomputed.
    fn refresh_sibling_height(&mut self, id: NodeId) {
        if let Some(sibling) = self.get_sibling(id) {
            self.update_height_from_child(sibling);
        }
    }

    /// The node of minimum cached height reachable from `start` (including `start`). Any of
    /// several equally low nodes may be returned.
    pub fn get_lowest_leaf(&self, start: NodeId) -> Option<NodeId> {
        let mut lowest = self.get(start)?;
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let node = self.at(current);
            if node.height < lowest.height {
                lowest = node;
            }
            stack.extend(node.children());
        }
        Some(lowest.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Nodelike, Role};
    use test_log;

    // A left spine of length `n` below a root, the root's right child being a leaf:
    //       r
    //      / \
    //     a   b
    //    /
    //   ...
    fn spine(n: usize) -> (NodeArena<usize>, NodeId, Vec<NodeId>, NodeId) {
        let mut arena = NodeArena::new();
        let root = arena.alloc(0, Role::Root);
        let right = arena.alloc(100, Role::Root);
        arena.insert_right_child(root, right);

        let mut spine = vec![];
        let mut parent = root;
        for value in 1..=n {
            let node = arena.alloc(value, Role::Root);
            arena.insert_left_child(parent, node);
            spine.push(node);
            parent = node;
        }
        (arena, root, spine, right)
    }

    #[test_log::test]
    fn test_height_from_child() {
        let (mut arena, root, spine, right) = spine(3);
        assert_eq!(arena.update_height_from_child(right), 0);
        assert_eq!(arena.update_height_from_child(spine[2]), 0);
        assert_eq!(arena.update_height_from_child(spine[0]), 2);
        assert_eq!(arena.update_height_from_child(root), 3);
    }

    #[test_log::test]
    fn test_height_from_parent() {
        let (mut arena, root, spine, _) = spine(3);
        arena.at_mut(spine[0]).height = 42;
        assert_eq!(arena.update_height_from_parent(spine[0]), 2);
        assert_eq!(arena.update_height_from_parent(root), 3);
    }

    #[test_log::test]
    fn test_ancestor_size_walks_to_root() {
        let (mut arena, root, spine, _) = spine(3);
        let leaf = arena.alloc(7, Role::Root);
        // Link without propagation and push the sizes manually
        arena.at_mut(spine[2]).right = Some(leaf);
        arena.at_mut(leaf).parent = Some(spine[2]);
        arena.at_mut(leaf).role = Role::RightChild;

        arena.update_size(spine[2]);
        arena.update_ancestor_size(spine[2]);
        assert_eq!(arena.at(spine[2]).size(), 2);
        assert_eq!(arena.at(spine[1]).size(), 3);
        assert_eq!(arena.at(spine[0]).size(), 4);
        assert_eq!(arena.at(root).size(), 6);
    }

    #[test_log::test]
    fn test_ancestor_height_stops_early() {
        let (mut arena, root, spine, right) = spine(3);
        // Growing the short side does not change the root: the walk must stop at the root's
        // recomputation without complaint and leave everything consistent.
        let leaf = arena.alloc(101, Role::Root);
        arena.insert_left_child(right, leaf);
        assert_eq!(arena.at(right).height(), 1);
        assert_eq!(arena.at(root).height(), 3);

        // Corrupt a cache above the point where the walk stops. It must stay corrupt, which
        // shows the propagation did not climb that far.
        arena.at_mut(root).height = 99;
        let other = arena.alloc(102, Role::Root);
        arena.insert_right_child(right, other);
        assert_eq!(arena.at(right).height(), 1);
        assert_eq!(arena.at(root).height(), 99);
        assert_eq!(arena.at(spine[0]).height(), 2);
    }

    #[test_log::test]
    fn test_ancestor_height_through_edit_point() {
        let (mut arena, root, spine, right) = spine(3);
        // Give the right child a short subtree, then cut the deeper left spine below spine[0].
        let leaf = arena.alloc(101, Role::Root);
        arena.insert_left_child(right, leaf);
        assert_eq!(arena.at(root).height(), 3);

        arena.remove(spine[0]);
        let anchor = arena.get_lowest_leaf(root).expect("root is alive");
        arena.update_height_from_child(anchor);
        arena.update_ancestor_height_through(anchor, root);
        assert_eq!(arena.at(root).height(), 2);
        assert_eq!(arena.at(right).height(), 1);
    }

    #[test_log::test]
    fn test_descendant_depth() {
        let (mut arena, _, spine, _) = spine(3);
        arena.detach(spine[0]);
        arena.update_depth(spine[0]);
        arena.update_descendant_depth(spine[0]);

        assert_eq!(arena.at(spine[0]).depth(), 0);
        assert_eq!(arena.at(spine[1]).depth(), 1);
        assert_eq!(arena.at(spine[2]).depth(), 2);
    }

    #[test_log::test]
    fn test_lowest_leaf() {
        let (arena, root, spine, right) = spine(3);
        let lowest = arena.get_lowest_leaf(root).expect("root is alive");
        assert!(lowest == right || lowest == spine[2]);
        assert_eq!(arena.get_lowest_leaf(spine[0]), Some(spine[2]));
        assert_eq!(arena.get_lowest_leaf(right), Some(right));
    }
}
