//! Text rendering of trees with `termtree`.

use termtree::Tree;

use crate::domain::{FlatNodeRef, TreeNode};

const UNNAMED: &str = "<unnamed>";

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn display_label(label: &str) -> &str {
    if label.is_empty() {
        UNNAMED
    } else {
        label
    }
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let root = format!("{} [{}]", display_label(&self.label), self.id.0);
        let leaves: Vec<_> = self
            .children
            .iter()
            .flatten()
            .map(|c| c.to_tree_string())
            .collect();
        Tree::new(root).with_leaves(leaves)
    }
}

/// Renders a root sequence, one tree per root.
pub fn render_forest(roots: &[TreeNode]) -> String {
    if roots.is_empty() {
        return "Empty tree\n".to_string();
    }
    roots.iter().map(|r| r.to_tree_string().to_string()).collect()
}

/// One indented line per flat row, with a branch/leaf marker.
pub fn render_rows(rows: &[FlatNodeRef]) -> String {
    rows.iter()
        .map(|row| {
            let row = row.borrow();
            let marker = if row.expandable { "▸" } else { "·" };
            format!(
                "{:indent$}{} {} [{}] depth={}\n",
                "",
                marker,
                display_label(&row.label),
                row.id.0,
                row.depth,
                indent = row.depth * 2
            )
        })
        .collect()
}
