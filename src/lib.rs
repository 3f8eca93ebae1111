//! ## About
//!
//! This crate contains an arena allocated binary tree whose nodes keep track of three derived
//! metrics: the size of the subtree they root, their height above the lowest leaf below them,
//! and their depth below the root. All structural edits (grafting subtrees, removing or
//! splitting them off, inserting a new root) update these metrics incrementally instead of
//! recomputing the whole tree.
//!
//! See the [BinaryTree] struct to get started.
//!
//! ```
//! use bintree::BinaryTree;
//!
//! let tree = BinaryTree::deserialize([Some(0), Some(1), Some(2), None, Some(4)]);
//! assert_eq!(tree.size(), 4);
//! assert_eq!(tree.depth(), 2);
//! assert_eq!(tree.inorder_traversal(None).unwrap(), vec![1, 4, 0, 2]);
//! ```
//!
//! ## Naming conventions
//! * Traits – adjectives that indicate capability and behavior
//! * Structs – substantives that indicate entities implementing a behavior
//! * Methods – imperative forms with the exception of getters and factories, which
//!             are uses substantives (i.e., omit a `get_` prefix) much like the standard library.
//!             `get_sibling` and `get_lowest_leaf` keep the prefix as they search rather than read a field.

pub mod arena;
pub mod errors;
pub mod iterable_tree;
pub mod tree;

pub use arena::{BinaryNode, NodeArena, NodeId};
pub use errors::BinaryTreeError;
pub use iterable_tree::{Nodelike, Order, Role, TreeIterable};
pub use tree::{BinaryTree, LevelRecord};
