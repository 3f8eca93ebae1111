//! Definition of the interfaces for tree iteration

use crate::{arena::NodeId, BinaryTreeError};

/// Order of iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Value, then left subtree, then right subtree
    Preorder,
    /// Left subtree, then value, then right subtree
    Inorder,
    /// Left subtree, then right subtree, then value
    Postorder,
    /// Breadth-first, top level to bottom, left to right within a level
    LevelOrder,
}

/// Structural tag of a node. Must always match how the node is linked to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Root,
    LeftChild,
    RightChild,
}

/// Container that holds data in a `TreeIterable`
pub trait Nodelike<T> {
    fn is_leaf(&self) -> bool;
    fn get(&self) -> &T;

    fn id(&self) -> NodeId;
    fn role(&self) -> Role;

    /// Number of nodes in the subtree rooted here, including the node itself
    fn size(&self) -> usize;
    /// Distance to the farthest leaf below. Leaves have height 0.
    fn height(&self) -> usize;
    /// Get the node's distance to the root node.
    fn depth(&self) -> usize;
}

/// A binary tree hierarchy of data contained in `Nodelike`s that can be traversed in every [Order].
pub trait TreeIterable<T> {
    type Node: Nodelike<T>;

    /// Iterate over the nodes below `start` (the root if `None`) in the given order.
    /// Fails if `start` is not a node of this tree.
    fn iter<'a>(
        &'a self,
        order: Order,
        start: Option<NodeId>,
    ) -> Result<Box<dyn Iterator<Item = &'a Self::Node> + 'a>, BinaryTreeError>;
}
