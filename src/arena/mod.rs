//! [Arena memory allocated](https://en.wikipedia.org/wiki/Region-based_memory_management)
//! binary tree nodes.
//!
//! All nodes of a tree live in one [NodeArena]. Children are referenced by [NodeId] and owned
//! through their parent's child slot, the parent reference is a plain handle without ownership.
//! Removing a node frees its slot and those of all its descendants.

mod links;
mod node;
mod propagation;

pub use links::NodeArena;
pub use node::{BinaryNode, NodeId};
