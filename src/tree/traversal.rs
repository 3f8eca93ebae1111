/*! Iterative traversals of a [BinaryTree] in the four classic orders */

use super::BinaryTree;
use crate::{
    arena::{BinaryNode, NodeArena, NodeId},
    BinaryTreeError, Nodelike, Order, TreeIterable,
};
use itertools::Itertools;
use std::collections::VecDeque;

/// Iterator for a preorder traversal: node, left subtree, right subtree.
/// Right children are deferred on a stack while descending to the left.
pub struct PreorderIterator<'a, T> {
    nodes: &'a NodeArena<T>,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<'a, T> PreorderIterator<'a, T> {
    pub fn new(nodes: &'a NodeArena<T>, start: Option<NodeId>) -> Self {
        PreorderIterator {
            nodes,
            stack: vec![],
            current: start,
        }
    }
}

impl<'a, T> Iterator for PreorderIterator<'a, T> {
    type Item = &'a BinaryNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = match self.current {
            Some(id) => id,
            None => self.stack.pop()?,
        };
        let node = self.nodes.get(id)?;
        self.stack.extend(node.right());
        self.current = node.left();
        Some(node)
    }
}

/// Iterator for an inorder traversal: left subtree, node, right subtree.
/// Keeps the ancestors that still have to be emitted on a stack.
pub struct InorderIterator<'a, T> {
    nodes: &'a NodeArena<T>,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<'a, T> InorderIterator<'a, T> {
    pub fn new(nodes: &'a NodeArena<T>, start: Option<NodeId>) -> Self {
        InorderIterator {
            nodes,
            stack: vec![],
            current: start,
        }
    }
}

impl<'a, T> Iterator for InorderIterator<'a, T> {
    type Item = &'a BinaryNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.nodes.get(id)?.left();
        }
        let node = self.nodes.get(self.stack.pop()?)?;
        self.current = node.right();
        Some(node)
    }
}

/// Iterator for a postorder traversal: left subtree, right subtree, node.
///
/// Uses a single stack. Whenever the top of the stack is not the parent of the node emitted
/// last, the top is the root of an unvisited right subtree and the iterator first descends to
/// that subtree's highest leftmost leaf.
pub struct PostorderIterator<'a, T> {
    nodes: &'a NodeArena<T>,
    stack: Vec<NodeId>,
    visited: Option<NodeId>,
}

impl<'a, T> PostorderIterator<'a, T> {
    pub fn new(nodes: &'a NodeArena<T>, start: Option<NodeId>) -> Self {
        PostorderIterator {
            nodes,
            stack: start.into_iter().collect(),
            visited: None,
        }
    }

    /// Descends from the top of the stack to the first leaf reachable by preferring left
    /// children, pushing every node on the way and any right sibling to visit later.
    fn to_highest_leftmost_leaf(&mut self) {
        let nodes = self.nodes;
        let mut top = self.stack.last().and_then(|id| nodes.get(*id));
        while let Some(node) = top {
            let next = match (node.left(), node.right()) {
                (Some(left), right) => {
                    self.stack.extend(right);
                    left
                }
                (None, Some(right)) => right,
                (None, None) => break,
            };
            self.stack.push(next);
            top = nodes.get(next);
        }
    }
}

impl<'a, T> Iterator for PostorderIterator<'a, T> {
    type Item = &'a BinaryNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let top = *self.stack.last()?;
        let parent = self
            .visited
            .and_then(|id| self.nodes.get(id))
            .and_then(|node| node.parent());
        if parent != Some(top) {
            self.to_highest_leftmost_leaf();
        }
        let node = self.nodes.get(self.stack.pop()?)?;
        self.visited = Some(node.id());
        Some(node)
    }
}

/// Iterator for a breadth-first traversal, level by level from left to right
pub struct LevelOrderIterator<'a, T> {
    nodes: &'a NodeArena<T>,
    queue: VecDeque<NodeId>,
}

impl<'a, T> LevelOrderIterator<'a, T> {
    pub fn new(nodes: &'a NodeArena<T>, start: Option<NodeId>) -> Self {
        LevelOrderIterator {
            nodes,
            queue: start.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for LevelOrderIterator<'a, T> {
    type Item = &'a BinaryNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.queue.pop_front()?)?;
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(node)
    }
}

/// A node's value together with its derived metrics, as reported by a level order traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRecord<T> {
    pub value: T,
    pub height: usize,
    pub depth: usize,
}

impl<T: Clone> From<&BinaryNode<T>> for LevelRecord<T> {
    fn from(node: &BinaryNode<T>) -> Self {
        LevelRecord {
            value: node.get().clone(),
            height: node.height(),
            depth: node.depth(),
        }
    }
}

impl<T> BinaryTree<T> {
    pub fn iter_preorder(&self) -> PreorderIterator<'_, T> {
        PreorderIterator::new(&self.nodes, self.root)
    }

    pub fn iter_preorder_sub(&self, root: &BinaryNode<T>) -> PreorderIterator<'_, T> {
        PreorderIterator::new(&self.nodes, Some(root.id()))
    }

    pub fn iter_inorder(&self) -> InorderIterator<'_, T> {
        InorderIterator::new(&self.nodes, self.root)
    }

    pub fn iter_inorder_sub(&self, root: &BinaryNode<T>) -> InorderIterator<'_, T> {
        InorderIterator::new(&self.nodes, Some(root.id()))
    }

    pub fn iter_postorder(&self) -> PostorderIterator<'_, T> {
        PostorderIterator::new(&self.nodes, self.root)
    }

    pub fn iter_postorder_sub(&self, root: &BinaryNode<T>) -> PostorderIterator<'_, T> {
        PostorderIterator::new(&self.nodes, Some(root.id()))
    }

    pub fn iter_level_order(&self) -> LevelOrderIterator<'_, T> {
        LevelOrderIterator::new(&self.nodes, self.root)
    }

    pub fn iter_level_order_sub(&self, root: &BinaryNode<T>) -> LevelOrderIterator<'_, T> {
        LevelOrderIterator::new(&self.nodes, Some(root.id()))
    }

    /// Values in preorder, starting at `start` (the root if `None`)
    pub fn preorder_traversal(&self, start: Option<NodeId>) -> Result<Vec<T>, BinaryTreeError>
    where
        T: Clone,
    {
        Ok(PreorderIterator::new(&self.nodes, self.start(start)?)
            .map(|node| node.get().clone())
            .collect_vec())
    }

    /// Values in inorder, starting at `start` (the root if `None`)
    pub fn inorder_traversal(&self, start: Option<NodeId>) -> Result<Vec<T>, BinaryTreeError>
    where
        T: Clone,
    {
        Ok(InorderIterator::new(&self.nodes, self.start(start)?)
            .map(|node| node.get().clone())
            .collect_vec())
    }

    /// Values in postorder, starting at `start` (the root if `None`)
    pub fn postorder_traversal(&self, start: Option<NodeId>) -> Result<Vec<T>, BinaryTreeError>
    where
        T: Clone,
    {
        Ok(PostorderIterator::new(&self.nodes, self.start(start)?)
            .map(|node| node.get().clone())
            .collect_vec())
    }

    /// Breadth-first traversal grouped by level. Each record carries the node's height and
    /// depth next to its value.
    pub fn level_order_traversal(&self, start: Option<NodeId>) -> Result<Vec<Vec<LevelRecord<T>>>, BinaryTreeError>
    where
        T: Clone,
    {
        let levels = LevelOrderIterator::new(&self.nodes, self.start(start)?).chunk_by(|node| node.depth());
        let records = levels
            .into_iter()
            .map(|(_, level)| level.map(LevelRecord::from).collect_vec())
            .collect_vec();
        Ok(records)
    }

    /// Breadth-first traversal flattened into plain values
    pub fn level_order_values(&self, start: Option<NodeId>) -> Result<Vec<T>, BinaryTreeError>
    where
        T: Clone,
    {
        Ok(LevelOrderIterator::new(&self.nodes, self.start(start)?)
            .map(|node| node.get().clone())
            .collect_vec())
    }
}

impl<T> TreeIterable<T> for BinaryTree<T> {
    type Node = BinaryNode<T>;

    fn iter<'a>(
        &'a self,
        order: Order,
        start: Option<NodeId>,
    ) -> Result<Box<dyn Iterator<Item = &'a Self::Node> + 'a>, BinaryTreeError> {
        let start = self.start(start)?;
        Ok(match order {
            Order::Preorder => Box::new(PreorderIterator::new(&self.nodes, start)),
            Order::Inorder => Box::new(InorderIterator::new(&self.nodes, start)),
            Order::Postorder => Box::new(PostorderIterator::new(&self.nodes, start)),
            Order::LevelOrder => Box::new(LevelOrderIterator::new(&self.nodes, start)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log;

    //       0
    //     /   \
    //    1     2
    //     \     \
    //      4     6
    //     /
    //    7
    fn sample() -> BinaryTree<i32> {
        BinaryTree::deserialize([Some(0), Some(1), Some(2), None, Some(4), None, Some(6), Some(7)])
    }

    fn full() -> BinaryTree<i32> {
        BinaryTree::deserialize((0..7).map(Some))
    }

    #[test_log::test]
    fn test_preorder() {
        assert_eq!(sample().preorder_traversal(None).unwrap(), vec![0, 1, 4, 7, 2, 6]);
        assert_eq!(full().preorder_traversal(None).unwrap(), vec![0, 1, 3, 4, 2, 5, 6]);
        assert!(BinaryTree::<i32>::new().preorder_traversal(None).unwrap().is_empty());
    }

    #[test_log::test]
    fn test_inorder() {
        assert_eq!(sample().inorder_traversal(None).unwrap(), vec![1, 7, 4, 0, 2, 6]);
        assert_eq!(full().inorder_traversal(None).unwrap(), vec![3, 1, 4, 0, 5, 2, 6]);
        assert!(BinaryTree::<i32>::new().inorder_traversal(None).unwrap().is_empty());
    }

    #[test_log::test]
    fn test_postorder() {
        assert_eq!(sample().postorder_traversal(None).unwrap(), vec![7, 4, 1, 6, 2, 0]);
        assert_eq!(full().postorder_traversal(None).unwrap(), vec![3, 4, 1, 5, 6, 2, 0]);
        assert!(BinaryTree::<i32>::new().postorder_traversal(None).unwrap().is_empty());
    }

    #[test_log::test]
    fn test_level_order() {
        let tree = sample();
        let levels = tree
            .level_order_traversal(None)
            .unwrap()
            .into_iter()
            .map(|level| level.into_iter().map(|r| (r.value, r.height, r.depth)).collect_vec())
            .collect_vec();
        assert_eq!(
            levels,
            vec![
                vec![(0, 3, 0)],
                vec![(1, 2, 1), (2, 1, 1)],
                vec![(4, 1, 2), (6, 0, 2)],
                vec![(7, 0, 3)],
            ]
        );
        assert_eq!(tree.level_order_values(None).unwrap(), vec![0, 1, 2, 4, 6, 7]);
        assert_eq!(full().level_order_values(None).unwrap(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(BinaryTree::<i32>::new().level_order_traversal(None).unwrap().is_empty());
    }

    #[test_log::test]
    fn test_starting_node() {
        let tree = sample();
        let left = tree.root().unwrap().left().unwrap();

        assert_eq!(tree.preorder_traversal(Some(left)).unwrap(), vec![1, 4, 7]);
        assert_eq!(tree.inorder_traversal(Some(left)).unwrap(), vec![1, 7, 4]);
        assert_eq!(tree.postorder_traversal(Some(left)).unwrap(), vec![7, 4, 1]);
        assert_eq!(tree.level_order_values(Some(left)).unwrap(), vec![1, 4, 7]);

        let sub = tree.level_order_traversal(Some(left)).unwrap();
        assert_eq!(sub.len(), 3);
        assert_eq!(sub[0], vec![LevelRecord { value: 1, height: 2, depth: 1 }]);
    }

    #[test_log::test]
    fn test_unknown_starting_node() {
        let mut tree = sample();
        let left = tree.root().unwrap().left().unwrap();
        tree.remove_subtree(left).unwrap();

        assert_eq!(
            tree.preorder_traversal(Some(left)),
            Err(BinaryTreeError::UnknownNode(left))
        );
        assert!(tree.iter(Order::Postorder, Some(left)).is_err());
    }

    #[test_log::test]
    fn test_tree_iterable() {
        let tree = full();
        let orders = [Order::Preorder, Order::Inorder, Order::Postorder, Order::LevelOrder];
        let result = orders
            .iter()
            .map(|order| tree.iter(*order, None).unwrap().map(|n| *n.get()).collect_vec())
            .collect_vec();
        assert_eq!(
            result,
            vec![
                vec![0, 1, 3, 4, 2, 5, 6],
                vec![3, 1, 4, 0, 5, 2, 6],
                vec![3, 4, 1, 5, 6, 2, 0],
                vec![0, 1, 2, 3, 4, 5, 6],
            ]
        );

        let right = tree.node(tree.root().unwrap().right().unwrap()).unwrap();
        let result = tree.iter_postorder_sub(right).map(|n| *n.get()).collect_vec();
        assert_eq!(result, &[5, 6, 2]);
        assert_eq!(tree.iter_level_order().count(), 7);
    }
}
