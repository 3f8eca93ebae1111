//! The tree-level wrapper around a [NodeArena].
//!
//! A [BinaryTree] owns the arena and the handle of its root. Structural edits are delegated to
//! the arena, which keeps the per-node metrics consistent. The aggregate `size` and `depth` of
//! the tree are refreshed from the root after every edit.

mod encoding;
mod traversal;

pub use traversal::{
    InorderIterator, LevelOrderIterator, LevelRecord, PostorderIterator, PreorderIterator,
};

use crate::{
    arena::{BinaryNode, NodeArena, NodeId},
    BinaryTreeError, Nodelike, Role,
};
use tracing::debug;
use tracing_attributes::instrument;

/// Binary tree with arena allocated nodes that maintain their subtree size, height and depth.
///
/// Handles ([NodeId]) returned by the tree stay valid until the node is removed or split off.
/// Passing a handle of a node that has left the tree yields [BinaryTreeError::UnknownNode].
/// Handles issued by a *different* tree must not be used; they are only detected if their
/// slot is not alive here.
#[derive(Debug)]
pub struct BinaryTree<T> {
    nodes: NodeArena<T>,
    root: Option<NodeId>,
    /// Mirrors the root's size
    size: usize,
    /// Mirrors the root's height, i.e. the vertical extent of the tree
    depth: usize,
}

impl<T> BinaryTree<T> {
    /// An empty tree
    pub fn new() -> Self {
        BinaryTree {
            nodes: NodeArena::new(),
            root: None,
            size: 0,
            depth: 0,
        }
    }

    /// An empty tree with room for `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        BinaryTree {
            nodes: NodeArena::with_capacity(capacity),
            root: None,
            size: 0,
            depth: 0,
        }
    }

    /// A tree consisting of a single node
    pub fn with_root(value: T) -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.alloc(value, Role::Root);
        Self::from_parts(nodes, Some(root))
    }

    fn from_parts(nodes: NodeArena<T>, root: Option<NodeId>) -> Self {
        let mut tree = BinaryTree {
            nodes,
            root,
            size: 0,
            depth: 0,
        };
        tree.refresh_cache();
        tree
    }

    fn into_parts(self) -> (NodeArena<T>, Option<NodeId>) {
        (self.nodes, self.root)
    }

    fn refresh_cache(&mut self) {
        (self.size, self.depth) = self
            .root()
            .map_or((0, 0), |root| (root.size(), root.height()));
    }

    /// Looks the node up, failing for handles that are not alive in this tree.
    fn checked(&self, id: NodeId) -> Result<&BinaryNode<T>, BinaryTreeError> {
        self.nodes.get(id).ok_or(BinaryTreeError::UnknownNode(id))
    }

    /// Resolves an optional starting node, defaulting to the root. `None` for an empty tree.
    fn start(&self, start: Option<NodeId>) -> Result<Option<NodeId>, BinaryTreeError> {
        match start {
            Some(id) => self.checked(id).map(|node| Some(node.id())),
            None => Ok(self.root),
        }
    }

    /// Number of nodes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Vertical extent of the tree, which is the height of the root (0 for an empty tree).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&BinaryNode<T>> {
        self.root.and_then(|root| self.nodes.get(root))
    }

    pub fn node(&self, id: NodeId) -> Option<&BinaryNode<T>> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's value. The structure can only be changed through the tree.
    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|node| node.get_mut())
    }

    /// Read access to the underlying storage
    pub fn nodes(&self) -> &NodeArena<T> {
        &self.nodes
    }

    /// Whether every level of the tree is completely filled
    pub fn is_full_binary_tree(&self) -> bool {
        match self.root() {
            Some(root) => 1usize
                .checked_shl(root.height() as u32 + 1)
                .is_some_and(|capacity| self.size == capacity - 1),
            None => false,
        }
    }

    /// Makes the root of `new_root` the root of this tree. The current tree is attached as the
    /// left child of the new root if that slot is free, as the right child otherwise.
    ///
    /// Fails if the new root already has both children, since the current tree could not be
    /// attached anywhere. Handles into the current tree stay valid, the nodes of `new_root`
    /// are moved over and get new handles. Returns the handle of the new root.
    #[instrument(skip_all, level = "debug")]
    pub fn insert_root(&mut self, new_root: BinaryTree<T>) -> Result<NodeId, BinaryTreeError> {
        let root = new_root.root().ok_or(BinaryTreeError::RootNotSet)?;
        let (id, occupied) = (root.id(), (root.has_left_child(), root.has_right_child()));
        if self.is_empty() {
            *self = new_root;
            return Ok(id);
        }
        let role = match occupied {
            (false, _) => Role::LeftChild,
            (true, false) => Role::RightChild,
            (true, true) => {
                return Err(BinaryTreeError::InvalidOperation(
                    "the new root already has two children".to_string(),
                ))
            }
        };

        let (nodes, _) = new_root.into_parts();
        let new_root = self.nodes.adopt(nodes, id);
        if let Some(old_root) = self.root {
            debug!("Attaching the previous tree below the new root as {role:?}");
            self.nodes.insert_child(new_root, old_root, role);
        }
        self.root = Some(new_root);
        self.refresh_cache();
        Ok(new_root)
    }

    /// Moves `subtree` into this tree and makes its root the left child of `parent`. A left
    /// subtree already present is destroyed. Returns the new handle of the grafted root.
    #[instrument(skip(self, subtree), level = "debug")]
    pub fn insert_left_subtree(&mut self, parent: NodeId, subtree: BinaryTree<T>) -> Result<NodeId, BinaryTreeError> {
        let child = self.adopt_subtree(parent, subtree)?;
        self.nodes.insert_left_child(parent, child);
        self.refresh_cache();
        Ok(child)
    }

    /// Moves `subtree` into this tree and makes its root the right child of `parent`. A right
    /// subtree already present is destroyed. Returns the new handle of the grafted root.
    #[instrument(skip(self, subtree), level = "debug")]
    pub fn insert_right_subtree(&mut self, parent: NodeId, subtree: BinaryTree<T>) -> Result<NodeId, BinaryTreeError> {
        let child = self.adopt_subtree(parent, subtree)?;
        self.nodes.insert_right_child(parent, child);
        self.refresh_cache();
        Ok(child)
    }

    /// Shortcut for [insert_left_subtree](Self::insert_left_subtree) with a single node
    pub fn insert_left_child(&mut self, parent: NodeId, value: T) -> Result<NodeId, BinaryTreeError> {
        self.insert_left_subtree(parent, BinaryTree::with_root(value))
    }

    /// Shortcut for [insert_right_subtree](Self::insert_right_subtree) with a single node
    pub fn insert_right_child(&mut self, parent: NodeId, value: T) -> Result<NodeId, BinaryTreeError> {
        self.insert_right_subtree(parent, BinaryTree::with_root(value))
    }

    /// Moves the nodes of `subtree` into this arena, still detached
    fn adopt_subtree(&mut self, parent: NodeId, subtree: BinaryTree<T>) -> Result<NodeId, BinaryTreeError> {
        self.checked(parent)?;
        let (nodes, root) = subtree.into_parts();
        let root = root.ok_or(BinaryTreeError::RootNotSet)?;
        Ok(self.nodes.adopt(nodes, root))
    }

    /// The node of minimum height reachable from `start` (the root if `None`).
    pub fn get_lowest_leaf(&self, start: Option<NodeId>) -> Result<NodeId, BinaryTreeError> {
        let start = self.start(start)?.ok_or(BinaryTreeError::RootNotSet)?;
        self.nodes
            .get_lowest_leaf(start)
            .ok_or(BinaryTreeError::UnknownNode(start))
    }

    /// Destroys the node and all of its descendants. Removing the root empties the tree.
    #[instrument(skip(self), level = "debug")]
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<(), BinaryTreeError> {
        self.checked(id)?;
        self.nodes.clear_descendant(id);

        let Some(parent) = self.nodes.remove(id) else {
            debug!("Removed the root, the tree is empty now");
            self.nodes.clear();
            self.root = None;
            self.refresh_cache();
            return Ok(());
        };
        self.repair_truncated(parent);
        self.refresh_cache();
        Ok(())
    }

    /// Detaches the subtree rooted at the node and returns it as a tree of its own. Splitting
    /// off the root hands over the whole tree and leaves this one empty.
    #[instrument(skip(self), level = "debug")]
    pub fn split_subtree(&mut self, id: NodeId) -> Result<BinaryTree<T>, BinaryTreeError> {
        self.checked(id)?;

        let Some(parent) = self.nodes.detach(id) else {
            debug!("Split off the root, handing over the whole tree");
            return Ok(std::mem::take(self));
        };
        self.repair_truncated(parent);
        self.refresh_cache();

        let (mut nodes, root) = self.nodes.extract(id);
        nodes.update_depth(root);
        nodes.update_descendant_depth(root);
        if let Some(lowest) = nodes.get_lowest_leaf(root) {
            nodes.update_height_from_child(lowest);
            nodes.update_ancestor_height(lowest);
        }
        Ok(BinaryTree::from_parts(nodes, Some(root)))
    }

    /// Restores sizes and heights after a child of `parent` has been cut off.
    fn repair_truncated(&mut self, parent: NodeId) {
        if let Some(lowest) = self.nodes.get_lowest_leaf(parent) {
            self.nodes.update_height_from_child(lowest);
            self.nodes.update_ancestor_height_through(lowest, parent);
        }
        self.nodes.update_size(parent);
        self.nodes.update_ancestor_size(parent);
    }
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}
