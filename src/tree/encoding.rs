//! The two flat array encodings of a [BinaryTree]. They are not interchangeable:
//!
//! * **Level-gap encoding** ([deserialize](BinaryTree::deserialize) and
//!   [serialize](BinaryTree::serialize)): breadth-first, two slots for every placed node.
//!   `None` marks a missing child and does not claim slots for descendants.
//! * **Complete-tree index encoding** ([copy_from_iterable](BinaryTree::copy_from_iterable)):
//!   implicit heap layout, the parent of position `i` is `(i + 1) / 2 - 1`. `None` still
//!   occupies the positions of its would-be descendants.

use super::BinaryTree;
use crate::{arena::NodeId, Nodelike, Role};
use std::collections::VecDeque;

impl<T> BinaryTree<T> {
    /// Builds a tree from the level-gap encoding. An empty sequence, or one starting with
    /// `None`, gives an empty tree.
    pub fn deserialize<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
    {
        let mut values = values.into_iter().fuse();
        let Some(Some(value)) = values.next() else {
            return Self::new();
        };
        let mut tree = Self::with_root(value);
        let mut queue = VecDeque::from_iter(tree.root);

        while let Some(parent) = queue.pop_front() {
            for role in [Role::LeftChild, Role::RightChild] {
                let Some(entry) = values.next() else {
                    break;
                };
                if let Some(value) = entry {
                    let child = tree.nodes.alloc(value, role);
                    tree.nodes.insert_child(parent, child, role);
                    queue.push_back(child);
                }
            }
        }
        tree.refresh_cache();
        tree
    }

    /// Level-gap encoding of the tree. A missing child is written as `None` if its parent
    /// exists; trailing `None`s are dropped.
    pub fn serialize(&self) -> Vec<Option<T>>
    where
        T: Clone,
    {
        let mut values = vec![];
        let mut queue = VecDeque::from([self.root]);

        while let Some(entry) = queue.pop_front() {
            match entry.and_then(|id| self.nodes.get(id)) {
                Some(node) => {
                    values.push(Some(node.get().clone()));
                    queue.push_back(node.left());
                    queue.push_back(node.right());
                }
                None => values.push(None),
            }
        }
        while matches!(values.last(), Some(None)) {
            values.pop();
        }
        values
    }

    /// Builds a tree from the complete-tree index encoding. Position `i > 0` is a left child
    /// for odd `i` and a right child for even `i`. Elements below a `None` are ignored.
    pub fn copy_from_iterable<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
    {
        let values = values.into_iter();
        let mut tree = Self::with_capacity(values.size_hint().0);
        let mut placed: Vec<Option<NodeId>> = Vec::with_capacity(values.size_hint().0);

        for (position, value) in values.enumerate() {
            let id = match (position, value) {
                (_, None) => None,
                (0, Some(value)) => {
                    let root = tree.nodes.alloc(value, Role::Root);
                    tree.root = Some(root);
                    Some(root)
                }
                (position, Some(value)) => placed[(position + 1) / 2 - 1].map(|parent| {
                    let role = if position % 2 == 1 {
                        Role::LeftChild
                    } else {
                        Role::RightChild
                    };
                    let child = tree.nodes.alloc(value, role);
                    tree.nodes.insert_child(parent, child, role);
                    child
                }),
            };
            placed.push(id);
        }
        tree.refresh_cache();
        tree
    }
}
