//! Tree builder for seed hierarchies.

use std::collections::HashSet;

use toml::{Table, Value};
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::node::{NodeId, TreeNode};

/// Result type for tree construction.
pub type TreeResult<T> = Result<T, DomainError>;

pub const DEFAULT_ROOT_LABEL: &str = "My Queries";

/// Built-in starting hierarchy.
pub fn default_seed(root_label: &str) -> Vec<TreeNode> {
    let leaf = |id, label| TreeNode::leaf(NodeId(id), label);
    vec![TreeNode::branch(
        NodeId(1),
        root_label,
        vec![
            leaf(2, "Equality"),
            TreeNode::branch(
                NodeId(3),
                "Bias",
                vec![leaf(4, "Gender"), leaf(5, "Racial"), leaf(6, "Social")],
            ),
            leaf(7, "CO2"),
            leaf(8, "Equality"),
            leaf(9, "Light"),
        ],
    )]
}

/// Builds a tree from a nested TOML outline, assigning ids in pre-order.
///
/// - a table becomes a branch holding its entries
/// - an array becomes a branch holding one node per element
/// - a string becomes a leaf labeled by the string
/// - any other scalar becomes a leaf labeled by its rendering
pub struct TreeBuilder {
    next_id: u64,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    #[instrument(level = "debug", skip(self, outline))]
    pub fn build_from_outline(&mut self, outline: &Table) -> TreeResult<Vec<TreeNode>> {
        outline
            .iter()
            .map(|(key, value)| self.build_node(key, value))
            .collect()
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn build_node(&mut self, key: &str, value: &Value) -> TreeResult<TreeNode> {
        // pre-order: parent id before any child id
        let id = self.allocate();
        match value {
            Value::Table(table) => {
                let children = table
                    .iter()
                    .map(|(k, v)| self.build_node(k, v))
                    .collect::<TreeResult<Vec<_>>>()?;
                Ok(TreeNode::branch(id, key, children))
            }
            Value::Array(items) => {
                let children = items
                    .iter()
                    .map(|item| self.build_element(key, item))
                    .collect::<TreeResult<Vec<_>>>()?;
                Ok(TreeNode::branch(id, key, children))
            }
            Value::String(s) => Ok(TreeNode::leaf(id, s.clone())),
            other => Ok(TreeNode::leaf(id, other.to_string())),
        }
    }

    fn build_element(&mut self, key: &str, item: &Value) -> TreeResult<TreeNode> {
        match item {
            Value::String(s) => Ok(TreeNode::leaf(self.allocate(), s.clone())),
            Value::Table(table) => {
                let mut nodes = self.build_from_outline(table)?;
                if nodes.len() != 1 {
                    return Err(DomainError::InvalidOutline {
                        key: key.to_string(),
                        message: format!(
                            "inline table in array must have exactly one entry, found {}",
                            nodes.len()
                        ),
                    });
                }
                Ok(nodes.remove(0))
            }
            Value::Array(_) => Err(DomainError::InvalidOutline {
                key: key.to_string(),
                message: "nested arrays have no label".to_string(),
            }),
            other => Ok(TreeNode::leaf(self.allocate(), other.to_string())),
        }
    }
}

/// Rejects trees in which an id occurs more than once.
pub fn validate_unique_ids(roots: &[TreeNode]) -> TreeResult<()> {
    let mut seen = HashSet::new();
    let mut stack: Vec<&TreeNode> = roots.iter().collect();
    while let Some(node) = stack.pop() {
        if !seen.insert(node.id) {
            return Err(DomainError::DuplicateId(node.id));
        }
        stack.extend(node.children.iter().flatten());
    }
    Ok(())
}
