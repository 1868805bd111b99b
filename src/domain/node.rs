//! Node model: the canonical nested node and its flattened projection.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a node, unique across the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(NodeId)
    }
}

/// Leaf or branch. Decided by presence of `children`, not by emptiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Branch,
}

/// Canonical nested node owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    #[serde(alias = "item")]
    pub label: String,
    /// `None` for a leaf, `Some` (possibly empty) for a branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            children: None,
        }
    }

    pub fn branch(id: NodeId, label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            id,
            label: label.into(),
            children: Some(children),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.children {
            Some(_) => NodeKind::Branch,
            None => NodeKind::Leaf,
        }
    }

    pub fn is_branch(&self) -> bool {
        self.kind() == NodeKind::Branch
    }

    /// Freshly created nodes carry an empty label until renamed.
    pub fn is_unnamed(&self) -> bool {
        self.label.is_empty()
    }

    /// A branch whose children sequence is present but empty.
    pub fn has_no_children(&self) -> bool {
        matches!(&self.children, Some(children) if children.is_empty())
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(TreeNode::subtree_len)
            .sum::<usize>()
    }

    /// Largest id in this subtree.
    pub fn max_id(&self) -> NodeId {
        self.children
            .iter()
            .flatten()
            .map(TreeNode::max_id)
            .fold(self.id, NodeId::max)
    }
}

/// Flattened projection of a [`TreeNode`] for linear rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    pub id: NodeId,
    pub label: String,
    /// Number of ancestors of the source node
    pub depth: usize,
    pub expandable: bool,
    /// Ordered child ids of the source node, `None` for a leaf
    pub children: Option<Vec<NodeId>>,
}

impl FlatNode {
    pub fn from_tree(node: &TreeNode, depth: usize) -> Self {
        Self {
            id: node.id,
            label: node.label.clone(),
            depth,
            expandable: node.is_branch(),
            children: child_ids(node),
        }
    }

    /// Refresh derived fields in place, keeping the instance.
    pub fn refresh(&mut self, node: &TreeNode, depth: usize) {
        self.depth = depth;
        self.expandable = node.is_branch();
        self.children = child_ids(node);
    }
}

fn child_ids(node: &TreeNode) -> Option<Vec<NodeId>> {
    node.children
        .as_ref()
        .map(|children| children.iter().map(|c| c.id).collect())
}

/// Shared handle to a flat node. Identity is pointer identity (`Rc::ptr_eq`).
pub type FlatNodeRef = Rc<RefCell<FlatNode>>;

/// Direction for sibling reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("unknown direction: {other} (expected up or down)")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}
