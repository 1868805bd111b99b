//! Id-based command and query surface for a presentation layer.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, instrument};

use crate::application::projector::FlatteningProjector;
use crate::application::store::{Outcome, SubscriptionId, TreeStore};
use crate::domain::{Direction, FlatNodeRef, NodeId, Rejection, TreeNode};

/// Owns a [`TreeStore`] and keeps a [`FlatteningProjector`] subscribed to it,
/// so the flat view is rebuilt once per committed change.
#[derive(Debug)]
pub struct TreeSession {
    store: TreeStore,
    projector: Rc<RefCell<FlatteningProjector>>,
    projection: SubscriptionId,
}

impl TreeSession {
    pub fn new(mut store: TreeStore) -> Self {
        let projector = Rc::new(RefCell::new(FlatteningProjector::new()));
        let sink = Rc::clone(&projector);
        let projection = store.subscribe(move |roots| {
            sink.borrow_mut().flatten(roots);
        });
        Self {
            store,
            projector,
            projection,
        }
    }

    pub fn from_roots(roots: Vec<TreeNode>) -> Self {
        Self::new(TreeStore::new(roots))
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn current_tree(&self) -> &[TreeNode] {
        self.store.current_tree()
    }

    /// Subscribes to the store's change stream (current tree delivered at once).
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[TreeNode]) + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        // the projection subscription is owned by the session
        id != self.projection && self.store.unsubscribe(id)
    }

    pub fn insert(&mut self, parent: NodeId, label: impl Into<String>) -> Outcome {
        self.store.insert(parent, label)
    }

    pub fn create_subfolder(&mut self, parent: NodeId, label: impl Into<String>) -> Outcome {
        self.store.create_subfolder(parent, label)
    }

    pub fn rename(&mut self, node: NodeId, label: impl Into<String>) -> Outcome {
        self.store.rename(node, label)
    }

    /// Moves `node` one position among its siblings. The parent is resolved
    /// from the flattened order; root-level nodes have none and are ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn reorder_siblings(&mut self, node: NodeId, direction: Direction) -> Outcome {
        let parent = self
            .flat_node(node)
            .and_then(|flat| self.parent(&flat))
            .map(|parent| parent.borrow().id);
        match parent {
            Some(parent) => self.store.reorder_siblings(parent, node, direction),
            None => {
                let reason = Rejection::ParentNotFound(node);
                debug!(%reason, "operation ignored");
                Outcome::Rejected(reason)
            }
        }
    }

    pub fn delete(&mut self, node: NodeId) -> Outcome {
        self.store.delete(node)
    }

    /// Current flattened sequence (cheap `Rc` clones).
    pub fn flat_nodes(&self) -> Vec<FlatNodeRef> {
        self.projector.borrow().flat_nodes().to_vec()
    }

    pub fn projector(&self) -> Ref<'_, FlatteningProjector> {
        self.projector.borrow()
    }

    pub fn flat_node(&self, id: NodeId) -> Option<FlatNodeRef> {
        self.projector.borrow().flat_node(id)
    }

    /// Resolves a flat row back to its canonical node.
    pub fn tree_node(&self, flat: &FlatNodeRef) -> Option<&TreeNode> {
        let path = self.projector.borrow().path_of(&flat.borrow()).cloned()?;
        let id = flat.borrow().id;
        path.resolve(self.store.current_tree())
            .filter(|node| node.id == id)
    }

    pub fn parent(&self, flat: &FlatNodeRef) -> Option<FlatNodeRef> {
        self.projector.borrow().parent_of(flat)
    }

    pub fn is_last_child(&self, flat: &FlatNodeRef) -> bool {
        self.projector.borrow().is_last_child(flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TreeSession {
        TreeSession::from_roots(vec![TreeNode::branch(
            NodeId(1),
            "root",
            vec![
                TreeNode::leaf(NodeId(2), "a"),
                TreeNode::leaf(NodeId(3), "b"),
            ],
        )])
    }

    #[test]
    fn given_new_session_when_created_then_projection_is_ready() {
        let session = session();
        assert_eq!(session.flat_nodes().len(), 3);
    }

    #[test]
    fn given_root_level_node_when_reordering_then_rejected() {
        let mut session = session();
        assert_eq!(
            session.reorder_siblings(NodeId(1), Direction::Down),
            Outcome::Rejected(Rejection::ParentNotFound(NodeId(1)))
        );
        assert_eq!(
            session.reorder_siblings(NodeId(99), Direction::Up),
            Outcome::Rejected(Rejection::ParentNotFound(NodeId(99)))
        );
    }

    #[test]
    fn given_projection_subscription_when_unsubscribing_then_refused() {
        let mut session = session();
        assert!(!session.unsubscribe(session.projection));
        session.rename(NodeId(2), "renamed");
        assert_eq!(session.flat_node(NodeId(2)).unwrap().borrow().label, "renamed");
    }
}
