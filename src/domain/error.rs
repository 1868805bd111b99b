//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Reason a tree operation was ignored.
///
/// Rejections never escape as failures: the store logs them and skips the
/// change notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("target {0} is a leaf and cannot hold children")]
    LeafParent(NodeId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("no parent found for node {0}")]
    ParentNotFound(NodeId),

    #[error("node id space exhausted")]
    IdsExhausted,
}

/// Domain errors represent malformed tree input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate node id in seed: {0}")]
    DuplicateId(NodeId),

    #[error("invalid outline entry '{key}': {message}")]
    InvalidOutline { key: String, message: String },

    #[error("seed defines both `nodes` and `outline`")]
    AmbiguousSeed,
}
