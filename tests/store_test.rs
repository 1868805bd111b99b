//! Integration tests for TreeStore mutations and change notifications.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::{fixture, rstest};

use querytree::application::{Outcome, TreeStore};
use querytree::domain::{Direction, NodeId, Rejection, TreeNode};
use querytree::util::testing;

/// root(1) -> [A(2), B(3), C(4) -> [D(5)]], plus leaf(6) with no children field
#[fixture]
fn store() -> TreeStore {
    testing::init_test_setup();
    TreeStore::new(vec![TreeNode::branch(
        NodeId(1),
        "root",
        vec![
            TreeNode::leaf(NodeId(2), "A"),
            TreeNode::leaf(NodeId(3), "B"),
            TreeNode::branch(NodeId(4), "C", vec![TreeNode::leaf(NodeId(5), "D")]),
            TreeNode::leaf(NodeId(6), "E"),
        ],
    )])
}

/// Counts emissions and keeps the last emitted tree.
fn record(store: &mut TreeStore) -> Rc<RefCell<Vec<Vec<TreeNode>>>> {
    let emissions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emissions);
    store.subscribe(move |roots| sink.borrow_mut().push(roots.to_vec()));
    emissions
}

fn child_labels(store: &TreeStore, parent: u64) -> Vec<String> {
    store
        .find(NodeId(parent))
        .and_then(|n| n.children.as_ref())
        .map(|c| c.iter().map(|n| n.label.clone()).collect())
        .unwrap_or_default()
}

fn all_ids(nodes: &[TreeNode], ids: &mut Vec<NodeId>) {
    for node in nodes {
        ids.push(node.id);
        if let Some(children) = &node.children {
            all_ids(children, ids);
        }
    }
}

// ============================================================
// Subscription
// ============================================================

#[rstest]
fn given_new_subscriber_when_subscribing_then_receives_current_tree_immediately(
    mut store: TreeStore,
) {
    let emissions = record(&mut store);
    assert_eq!(emissions.borrow().len(), 1);
    assert_eq!(emissions.borrow()[0], store.current_tree());
}

#[rstest]
fn given_two_subscribers_when_committing_then_delivered_in_subscription_order(
    mut store: TreeStore,
) {
    let order = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&order);
    let second = Rc::clone(&order);
    store.subscribe(move |_| first.borrow_mut().push("first"));
    store.subscribe(move |_| second.borrow_mut().push("second"));
    order.borrow_mut().clear();

    store.rename(NodeId(2), "A2");

    assert_eq!(*order.borrow(), vec!["first", "second"]);
}

// ============================================================
// Insert / create subfolder
// ============================================================

#[rstest]
fn given_branch_parent_when_inserting_then_appends_leaf_with_fresh_id(mut store: TreeStore) {
    let emissions = record(&mut store);

    let outcome = store.insert(NodeId(4), "new");

    assert_eq!(outcome, Outcome::Inserted(NodeId(7)));
    assert_eq!(child_labels(&store, 4), vec!["D", "new"]);
    let inserted = store.find(NodeId(7)).unwrap();
    assert!(inserted.children.is_none(), "insert creates a leaf");
    assert_eq!(emissions.borrow().len(), 2);
    assert_eq!(emissions.borrow()[1], store.current_tree());
}

#[rstest]
fn given_branch_parent_when_creating_subfolder_then_prepends_empty_branch(
    mut store: TreeStore,
) {
    let outcome = store.create_subfolder(NodeId(1), "folder");

    assert_eq!(outcome, Outcome::Inserted(NodeId(7)));
    let first = &store.find(NodeId(1)).unwrap().children.as_ref().unwrap()[0];
    assert_eq!(first, &TreeNode::branch(NodeId(7), "folder", vec![]));
}

#[rstest]
#[case::insert(true)]
#[case::subfolder(false)]
fn given_leaf_parent_when_adding_then_tree_unchanged_and_no_emission(
    mut store: TreeStore,
    #[case] insert: bool,
) {
    let before = store.current_tree().to_vec();
    let emissions = record(&mut store);

    let outcome = if insert {
        store.insert(NodeId(2), "x")
    } else {
        store.create_subfolder(NodeId(2), "x")
    };

    assert_eq!(outcome, Outcome::Rejected(Rejection::LeafParent(NodeId(2))));
    assert_eq!(store.current_tree(), before.as_slice());
    assert_eq!(emissions.borrow().len(), 1, "only the initial emission");
}

#[rstest]
fn given_many_inserts_and_deletes_when_allocating_then_ids_stay_unique(mut store: TreeStore) {
    for i in 0..10 {
        store.insert(NodeId(1), format!("leaf {i}"));
        store.create_subfolder(NodeId(4), format!("folder {i}"));
    }
    store.delete(NodeId(26));
    store.delete(NodeId(25));
    let outcome = store.insert(NodeId(1), "after delete");

    assert_eq!(outcome, Outcome::Inserted(NodeId(27)), "deleted ids are not reused");
    let mut ids = Vec::new();
    all_ids(store.current_tree(), &mut ids);
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert_eq!(store.node_count(), count);
}

// ============================================================
// Rename
// ============================================================

#[rstest]
fn given_live_node_when_renaming_then_label_changes_in_place(mut store: TreeStore) {
    let emissions = record(&mut store);

    assert_eq!(store.rename(NodeId(5), "renamed"), Outcome::Applied);

    assert_eq!(store.find(NodeId(5)).unwrap().label, "renamed");
    assert_eq!(child_labels(&store, 4), vec!["renamed"]);
    assert_eq!(emissions.borrow().len(), 2);
}

#[rstest]
fn given_unknown_node_when_renaming_then_ignored(mut store: TreeStore) {
    let emissions = record(&mut store);
    assert_eq!(
        store.rename(NodeId(99), "x"),
        Outcome::Rejected(Rejection::NodeNotFound(NodeId(99)))
    );
    assert_eq!(emissions.borrow().len(), 1);
}

// ============================================================
// Reorder
// ============================================================

#[rstest]
#[case::middle_up(3, Direction::Up, vec!["B", "A", "C", "E"])]
#[case::middle_down(3, Direction::Down, vec!["A", "C", "B", "E"])]
#[case::first_up(2, Direction::Up, vec!["A", "B", "C", "E"])]
#[case::last_down(6, Direction::Down, vec!["A", "B", "C", "E"])]
fn given_siblings_when_reordering_then_swaps_with_neighbour(
    mut store: TreeStore,
    #[case] target: u64,
    #[case] direction: Direction,
    #[case] expected: Vec<&str>,
) {
    let outcome = store.reorder_siblings(NodeId(1), NodeId(target), direction);

    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(child_labels(&store, 1), expected);
}

#[rstest]
fn given_boundary_move_when_reordering_then_still_emits_once(mut store: TreeStore) {
    let before = store.current_tree().to_vec();
    let emissions = record(&mut store);

    store.reorder_siblings(NodeId(1), NodeId(2), Direction::Up);

    assert_eq!(store.current_tree(), before.as_slice());
    assert_eq!(emissions.borrow().len(), 2);
}

#[rstest]
fn given_target_not_under_parent_when_reordering_then_ignored(mut store: TreeStore) {
    let emissions = record(&mut store);
    assert_eq!(
        store.reorder_siblings(NodeId(4), NodeId(2), Direction::Up),
        Outcome::Rejected(Rejection::NodeNotFound(NodeId(2)))
    );
    assert_eq!(
        store.reorder_siblings(NodeId(42), NodeId(2), Direction::Up),
        Outcome::Rejected(Rejection::ParentNotFound(NodeId(2)))
    );
    assert_eq!(emissions.borrow().len(), 1);
}

// ============================================================
// Delete
// ============================================================

#[rstest]
fn given_branch_with_subtree_when_deleting_then_removes_whole_subtree(mut store: TreeStore) {
    let before = store.node_count();
    let subtree = store.find(NodeId(4)).unwrap().subtree_len();

    assert_eq!(store.delete(NodeId(4)), Outcome::Applied);

    assert_eq!(store.node_count(), before - subtree);
    assert!(store.find(NodeId(5)).is_none());
    assert_eq!(child_labels(&store, 1), vec!["A", "B", "E"]);
}

#[rstest]
fn given_root_node_when_deleting_then_root_sequence_empties(mut store: TreeStore) {
    assert_eq!(store.delete(NodeId(1)), Outcome::Applied);
    assert!(store.current_tree().is_empty());
    assert_eq!(store.node_count(), 0);
}

#[rstest]
fn given_unknown_node_when_deleting_then_no_emission(mut store: TreeStore) {
    let emissions = record(&mut store);
    assert_eq!(
        store.delete(NodeId(77)),
        Outcome::Rejected(Rejection::NodeNotFound(NodeId(77)))
    );
    assert_eq!(emissions.borrow().len(), 1);
}
