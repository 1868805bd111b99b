//! In-memory hierarchical tree state.
//!
//! A [`TreeStore`](application::TreeStore) owns the canonical nested tree and
//! notifies subscribers after each committed edit. A
//! [`FlatteningProjector`](application::FlatteningProjector) turns that tree
//! into pre-order rows for linear rendering, keeping row instances stable
//! across unrelated edits. [`TreeSession`](application::TreeSession) ties
//! the two together behind an id-based command surface.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use application::{Outcome, TreeSession, TreeStore};
pub use domain::{Direction, FlatNode, FlatNodeRef, NodeId, TreeNode};
