//! The node stored in a [NodeArena](super::NodeArena) and the handle used to refer to it.

use crate::{Nodelike, Role};
use core::fmt;

/// Handle of a node inside its arena.
///
/// The generation distinguishes a live node from an earlier, already freed node that
/// occupied the same slot, so a handle kept across a removal never aliases a new node.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} (generation {})", self.index, self.generation)
    }
}

/// A node structure to be used in an arena allocated binary tree. Derived metrics are cached
/// and kept up to date by the arena's propagation methods.
#[derive(Debug)]
pub struct BinaryNode<T> {
    /// The user-defined value that the node owns
    pub(super) value: T,
    /// Own handle in the arena
    pub(super) index: NodeId,
    pub(super) role: Role,
    /// Non-owning back reference
    pub(super) parent: Option<NodeId>,
    pub(super) left: Option<NodeId>,
    pub(super) right: Option<NodeId>,
    pub(super) size: usize,
    pub(super) height: usize,
    pub(super) depth: usize,
}

impl<T> BinaryNode<T> {
    /// A detached leaf. Size and height follow from having no children, depth is set
    /// when the node gets linked.
    pub(super) fn new(value: T, index: NodeId, role: Role) -> Self {
        BinaryNode {
            value,
            index,
            role,
            parent: None,
            left: None,
            right: None,
            size: 1,
            height: 0,
            depth: 0,
        }
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn has_left_child(&self) -> bool {
        self.left.is_some()
    }

    pub fn has_right_child(&self) -> bool {
        self.right.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.role == Role::Root
    }

    pub fn is_left_child(&self) -> bool {
        self.role == Role::LeftChild
    }

    pub fn is_right_child(&self) -> bool {
        self.role == Role::RightChild
    }

    /// Child in the slot named by `role`. The root slot has no child.
    pub(super) fn child(&self, role: Role) -> Option<NodeId> {
        match role {
            Role::LeftChild => self.left,
            Role::RightChild => self.right,
            Role::Root => None,
        }
    }

    pub(super) fn child_mut(&mut self, role: Role) -> Option<&mut Option<NodeId>> {
        match role {
            Role::LeftChild => Some(&mut self.left),
            Role::RightChild => Some(&mut self.right),
            Role::Root => None,
        }
    }

    pub(super) fn children(&self) -> impl Iterator<Item = NodeId> {
        self.left.into_iter().chain(self.right)
    }
}

impl<T> Nodelike<T> for BinaryNode<T> {
    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn get(&self) -> &T {
        &self.value
    }

    fn id(&self) -> NodeId {
        self.index
    }

    fn role(&self) -> Role {
        self.role
    }

    fn size(&self) -> usize {
        self.size
    }

    fn height(&self) -> usize {
        self.height
    }

    fn depth(&self) -> usize {
        self.depth
    }
}

impl<T> fmt::Display for BinaryNode<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node {}, role: {:?}, size: {}, height: {}, depth: {}, value: {} ",
            self.index, self.role, self.size, self.height, self.depth, self.value
        )
    }
}
