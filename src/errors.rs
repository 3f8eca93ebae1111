//! Provides the error type used throughout this crate.

use crate::arena::NodeId;
use thiserror::Error;

/// The error type returned by the tree operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BinaryTreeError {
    #[error("Node not in tree: {0}")]
    UnknownNode(NodeId),
    #[error("No root node set")]
    RootNotSet,
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
