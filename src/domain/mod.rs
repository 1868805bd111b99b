//! Domain layer: node model, seed construction and error types
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod error;
pub mod node;

pub use builder::{default_seed, validate_unique_ids, TreeBuilder, DEFAULT_ROOT_LABEL};
pub use error::{DomainError, Rejection};
pub use node::{Direction, FlatNode, FlatNodeRef, NodeId, NodeKind, TreeNode};
