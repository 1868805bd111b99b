//! Flattening projector: nested tree to ordered, depth-annotated rows.
//!
//! Flat node instances are cached per id. A node seen again with the same
//! label keeps its instance (fields refreshed in place), so state anchored to
//! that instance survives edits elsewhere. A label change allocates a new
//! instance, which drops such state for the renamed node. So does a row that
//! a caller is still borrowing while the tree changes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::domain::{FlatNode, FlatNodeRef, NodeId, TreeNode};

/// Index path from the root sequence down to a node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    fn root(index: usize) -> Self {
        Self(vec![index])
    }

    fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Follows the path through `roots`.
    pub fn resolve<'t>(&self, roots: &'t [TreeNode]) -> Option<&'t TreeNode> {
        let (first, rest) = self.0.split_first()?;
        let mut node = roots.get(*first)?;
        for &index in rest {
            node = node.children.as_ref()?.get(index)?;
        }
        Some(node)
    }
}

#[derive(Debug, Default)]
pub struct FlatteningProjector {
    flat: Vec<FlatNodeRef>,
    /// nested -> flat, also the identity cache for the next pass
    nested_to_flat: HashMap<NodeId, FlatNodeRef>,
    /// flat -> nested
    flat_to_nested: HashMap<NodeId, NodePath>,
}

impl FlatteningProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the flat sequence and both lookup maps from `roots`.
    #[instrument(level = "debug", skip_all)]
    pub fn flatten(&mut self, roots: &[TreeNode]) -> &[FlatNodeRef] {
        let mut previous = std::mem::take(&mut self.nested_to_flat);
        self.flat_to_nested.clear();
        self.flat.clear();

        let mut stack: Vec<(&TreeNode, usize, NodePath)> = roots
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (node, 0, NodePath::root(i)))
            .collect();

        let mut reused = 0usize;
        while let Some((node, depth, path)) = stack.pop() {
            // Push children in reverse order for left-to-right traversal
            let children = node.children.as_deref().unwrap_or_default();
            for (i, child) in children.iter().enumerate().rev() {
                stack.push((child, depth + 1, path.child(i)));
            }

            let reusable = previous
                .remove(&node.id)
                .filter(|existing| existing.try_borrow().is_ok_and(|f| f.label == node.label));
            let flat = match reusable {
                // a row still borrowed by a reader is replaced, not refreshed
                Some(existing) if refresh_in_place(&existing, node, depth) => {
                    reused += 1;
                    existing
                }
                _ => Rc::new(RefCell::new(FlatNode::from_tree(node, depth))),
            };
            trace!(id = %node.id, depth, "flattened");

            self.nested_to_flat.insert(node.id, Rc::clone(&flat));
            self.flat_to_nested.insert(node.id, path);
            self.flat.push(flat);
        }

        debug!(rows = self.flat.len(), reused, dropped = previous.len(), "flattened tree");
        &self.flat
    }

    pub fn flat_nodes(&self) -> &[FlatNodeRef] {
        &self.flat
    }

    pub fn flat_node(&self, id: NodeId) -> Option<FlatNodeRef> {
        self.nested_to_flat.get(&id).cloned()
    }

    /// Nested -> flat lookup.
    pub fn flat_of(&self, node: &TreeNode) -> Option<FlatNodeRef> {
        self.flat_node(node.id)
    }

    pub fn path_of(&self, flat: &FlatNode) -> Option<&NodePath> {
        self.flat_to_nested.get(&flat.id)
    }

    /// Flat -> nested lookup against the tree the projector last flattened.
    pub fn nested_of<'t>(&self, flat: &FlatNode, roots: &'t [TreeNode]) -> Option<&'t TreeNode> {
        self.path_of(flat)?
            .resolve(roots)
            .filter(|node| node.id == flat.id)
    }

    /// Scans backwards from `flat` for the first row with a strictly lower depth.
    #[instrument(level = "trace", skip_all)]
    pub fn parent_of(&self, flat: &FlatNodeRef) -> Option<FlatNodeRef> {
        let depth = flat.borrow().depth;
        if depth < 1 {
            return None;
        }
        let position = self.flat.iter().position(|f| Rc::ptr_eq(f, flat))?;
        self.flat[..position]
            .iter()
            .rev()
            .find(|candidate| candidate.borrow().depth < depth)
            .cloned()
    }

    /// True when `flat` is the last entry of its parent's children.
    pub fn is_last_child(&self, flat: &FlatNodeRef) -> bool {
        let id = flat.borrow().id;
        let Some(parent) = self.parent_of(flat) else {
            return false;
        };
        let parent = parent.borrow();
        parent
            .children
            .as_ref()
            .and_then(|children| children.last())
            .is_some_and(|last| *last == id)
    }
}

/// Refreshes `existing` unless some caller still holds a borrow of it.
fn refresh_in_place(existing: &FlatNodeRef, node: &TreeNode, depth: usize) -> bool {
    existing
        .try_borrow_mut()
        .map(|mut flat| flat.refresh(node, depth))
        .is_ok()
}
