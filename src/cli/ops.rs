//! Scripted tree operations for `querytree run`.

use std::fmt;
use std::str::FromStr;

use crate::application::{Outcome, TreeSession};
use crate::domain::{Direction, NodeId};

/// One user intent, forwarded to the session as a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOp {
    Insert { parent: NodeId, label: String },
    Subfolder { parent: NodeId, label: String },
    Rename { node: NodeId, label: String },
    Move { node: NodeId, direction: Direction },
    Delete { node: NodeId },
}

impl TreeOp {
    pub fn apply(&self, session: &mut TreeSession) -> Outcome {
        match self {
            TreeOp::Insert { parent, label } => session.insert(*parent, label.as_str()),
            TreeOp::Subfolder { parent, label } => {
                session.create_subfolder(*parent, label.as_str())
            }
            TreeOp::Rename { node, label } => session.rename(*node, label.as_str()),
            TreeOp::Move { node, direction } => session.reorder_siblings(*node, *direction),
            TreeOp::Delete { node } => session.delete(*node),
        }
    }
}

fn parse_id(token: Option<&str>, op: &str) -> Result<NodeId, String> {
    let token = token.ok_or_else(|| format!("{op}: missing node id"))?;
    token
        .parse()
        .map_err(|_| format!("{op}: invalid node id '{token}'"))
}

impl FromStr for TreeOp {
    type Err = String;

    /// Labels take the rest of the line and may be empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim_start();
        let (id, label) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let id = (!id.is_empty()).then_some(id);
        let label = label.trim().to_string();

        match verb.to_ascii_lowercase().as_str() {
            "insert" | "add" => Ok(TreeOp::Insert {
                parent: parse_id(id, verb)?,
                label,
            }),
            "subfolder" | "folder" => Ok(TreeOp::Subfolder {
                parent: parse_id(id, verb)?,
                label,
            }),
            "rename" => Ok(TreeOp::Rename {
                node: parse_id(id, verb)?,
                label,
            }),
            "move" => Ok(TreeOp::Move {
                node: parse_id(id, verb)?,
                direction: label.parse()?,
            }),
            "delete" | "rm" => Ok(TreeOp::Delete {
                node: parse_id(id, verb)?,
            }),
            other => Err(format!("unknown operation: '{other}'")),
        }
    }
}

impl fmt::Display for TreeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeOp::Insert { parent, label } => write!(f, "insert {label:?} into {parent}"),
            TreeOp::Subfolder { parent, label } => write!(f, "subfolder {label:?} in {parent}"),
            TreeOp::Rename { node, label } => write!(f, "rename {node} to {label:?}"),
            TreeOp::Move { node, direction } => write!(f, "move {node} {direction}"),
            TreeOp::Delete { node } => write!(f, "delete {node}"),
        }
    }
}
