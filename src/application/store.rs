//! Tree store: single source of truth for the canonical tree.
//!
//! Every mutation either commits and notifies each subscriber exactly once
//! with the full root sequence, or is ignored without notification.

use std::fmt;

use tracing::{debug, instrument};

use crate::domain::{Direction, NodeId, Rejection, TreeNode};

/// Result of a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Inserted(NodeId),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Outcome::Rejected(_))
    }
}

/// Handle returned by [`TreeStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[TreeNode])>;

struct Subscriber {
    id: SubscriptionId,
    listener: Listener,
}

/// Hands out fresh ids. Monotonic, so a deleted id is never handed out again.
/// Once `u64::MAX` has been handed out the allocator is exhausted.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Option<u64>,
}

impl IdAllocator {
    pub fn after(roots: &[TreeNode]) -> Self {
        let max = roots.iter().map(|r| r.max_id().0).max().unwrap_or(0);
        Self {
            next: max.checked_add(1),
        }
    }

    pub fn allocate(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(NodeId(id))
    }
}

pub struct TreeStore {
    roots: Vec<TreeNode>,
    ids: IdAllocator,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl fmt::Debug for TreeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStore")
            .field("roots", &self.roots)
            .field("ids", &self.ids)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TreeStore {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        let ids = IdAllocator::after(&roots);
        Self {
            roots,
            ids,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Live root sequence. Read-only outside the store.
    pub fn current_tree(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        find_node(&self.roots, id)
    }

    pub fn node_count(&self) -> usize {
        self.roots.iter().map(TreeNode::subtree_len).sum()
    }

    /// Registers a listener and immediately delivers the current tree to it.
    #[instrument(level = "debug", skip(self, listener))]
    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&[TreeNode]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        listener(&self.roots);
        self.subscribers.push(Subscriber {
            id,
            listener: Box::new(listener),
        });
        debug!(?id, subscribers = self.subscribers.len(), "subscribed");
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    /// Appends a new leaf to the end of `parent`'s children.
    #[instrument(level = "debug", skip(self, label))]
    pub fn insert(&mut self, parent: NodeId, label: impl Into<String>) -> Outcome {
        self.add_child(parent, label.into(), Placement::Append)
    }

    /// Prepends a new, empty branch to the front of `parent`'s children.
    #[instrument(level = "debug", skip(self, label))]
    pub fn create_subfolder(&mut self, parent: NodeId, label: impl Into<String>) -> Outcome {
        self.add_child(parent, label.into(), Placement::PrependBranch)
    }

    #[instrument(level = "debug", skip(self, label))]
    pub fn rename(&mut self, node: NodeId, label: impl Into<String>) -> Outcome {
        let label = label.into();
        let outcome = match update_node(&mut self.roots, node, |n| n.label = label) {
            Some(()) => Outcome::Applied,
            None => Outcome::Rejected(Rejection::NodeNotFound(node)),
        };
        self.finish(outcome)
    }

    /// Swaps `target` with its neighbour under `parent`.
    ///
    /// At a boundary (first and `Up`, last and `Down`) the target is swapped
    /// with itself: the tree is unchanged but the operation still commits.
    #[instrument(level = "debug", skip(self))]
    pub fn reorder_siblings(
        &mut self,
        parent: NodeId,
        target: NodeId,
        direction: Direction,
    ) -> Outcome {
        let outcome = match find_node_mut(&mut self.roots, parent) {
            None => Outcome::Rejected(Rejection::ParentNotFound(target)),
            Some(parent_node) => match parent_node.children.as_mut() {
                None => Outcome::Rejected(Rejection::LeafParent(parent)),
                Some(children) => match children.iter().position(|c| c.id == target) {
                    None => Outcome::Rejected(Rejection::NodeNotFound(target)),
                    Some(index) => {
                        let neighbour = match direction {
                            Direction::Up => index.saturating_sub(1),
                            Direction::Down => (index + 1).min(children.len() - 1),
                        };
                        children.swap(index, neighbour);
                        Outcome::Applied
                    }
                },
            },
        };
        self.finish(outcome)
    }

    /// Removes the first node (depth-first) with id `node`, subtree included.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, node: NodeId) -> Outcome {
        let outcome = match remove_node(&mut self.roots, node) {
            Some(removed) => {
                debug!(removed = removed.subtree_len(), "subtree removed");
                Outcome::Applied
            }
            None => Outcome::Rejected(Rejection::NodeNotFound(node)),
        };
        self.finish(outcome)
    }

    fn add_child(&mut self, parent: NodeId, label: String, placement: Placement) -> Outcome {
        let outcome = match find_node_mut(&mut self.roots, parent) {
            None => Outcome::Rejected(Rejection::NodeNotFound(parent)),
            Some(parent_node) => match parent_node.children.as_mut() {
                None => Outcome::Rejected(Rejection::LeafParent(parent)),
                Some(children) => match self.ids.allocate() {
                    None => Outcome::Rejected(Rejection::IdsExhausted),
                    Some(id) => {
                        match placement {
                            Placement::Append => children.push(TreeNode::leaf(id, label)),
                            Placement::PrependBranch => {
                                children.insert(0, TreeNode::branch(id, label, Vec::new()))
                            }
                        }
                        Outcome::Inserted(id)
                    }
                },
            },
        };
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        match &outcome {
            Outcome::Rejected(reason) => debug!(%reason, "operation ignored"),
            _ => self.emit(),
        }
        outcome
    }

    fn emit(&mut self) {
        debug!(
            subscribers = self.subscribers.len(),
            nodes = self.node_count(),
            "committing change"
        );
        for subscriber in self.subscribers.iter_mut() {
            (subscriber.listener)(&self.roots);
        }
    }
}

enum Placement {
    Append,
    PrependBranch,
}

fn find_node(nodes: &[TreeNode], id: NodeId) -> Option<&TreeNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = node.children.as_deref().and_then(|c| find_node(c, id)) {
            return Some(found);
        }
    }
    None
}

fn find_node_mut(nodes: &mut [TreeNode], id: NodeId) -> Option<&mut TreeNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = node.children.as_deref_mut().and_then(|c| find_node_mut(c, id)) {
            return Some(found);
        }
    }
    None
}

/// Applies `update` to the first node with `id`, depth-first.
fn update_node<F>(nodes: &mut [TreeNode], id: NodeId, update: F) -> Option<()>
where
    F: FnOnce(&mut TreeNode),
{
    find_node_mut(nodes, id).map(update)
}

fn remove_node(nodes: &mut Vec<TreeNode>, id: NodeId) -> Option<TreeNode> {
    for index in 0..nodes.len() {
        if nodes[index].id == id {
            return Some(nodes.remove(index));
        }
        if let Some(children) = nodes[index].children.as_mut() {
            if let Some(removed) = remove_node(children, id) {
                return Some(removed);
            }
        }
    }
    None
}
