//! Public-API checks for the tree topology toolkit.

mod common;

use arbor_core::{ArborError, ArgumentError, Tree, TreeError};
use arbor_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tracing_subscriber::layer::SubscriberExt;

use common::{chain, seven_node_scenario};

#[test]
fn seven_node_chain_scenario() {
    let tree = seven_node_scenario().tree().expect("chain is valid");
    assert_eq!(tree.find_root(), 1);

    let counts = tree.edge_count_to_root(None).expect("root is known");
    assert_eq!(counts.len(), 7);
    for id in 1..=7 {
        assert_eq!(counts[&id], usize::try_from(id).expect("small id"));
    }

    assert_eq!(
        tree.find_common_ancestor(&[3, 6], None, None).expect("valid"),
        (3, 3)
    );
    assert_eq!(
        tree.find_common_ancestor(&[6, 3], Some(&counts), None)
            .expect("valid"),
        (3, 3)
    );
    assert!((tree.cable_length() - 6_000.0).abs() < 1e-9);
}

#[rstest]
#[case::first(2)]
#[case::middle(4)]
#[case::leaf(7)]
fn reroot_round_trip_on_chain(#[case] target: u64) {
    let original = Tree::from_rows(chain(7, 250.0)).expect("chain is valid");
    let mut tree = original.clone();
    tree.reroot(target).expect("target is in the tree");
    assert_eq!(tree.find_root(), target);
    assert_eq!(tree.parent(1).expect("known"), Some(2));
    tree.reroot(1).expect("node 1 is in the tree");
    assert_eq!(tree.to_rows(), original.to_rows());
}

#[test]
fn simplify_and_spanning_tree_on_chain() {
    let tree = seven_node_scenario().tree().expect("chain is valid");

    let spanning = tree.spanning_tree(&[6, 3]).expect("nodes are known");
    assert_eq!(spanning.find_root(), 3);
    let mut nodes: Vec<_> = spanning.node_ids().collect();
    nodes.sort_unstable();
    assert_eq!(nodes, vec![3, 4, 5, 6]);
    assert_eq!(tree.find_root(), 1, "spanning_tree leaves its input alone");

    let mut working = tree.clone();
    let reduced = working.simplify(&[3, 6]).expect("keepers are known");
    assert_eq!(reduced.nodes().collect::<Vec<_>>(), vec![3, 6]);
    assert!(reduced.contains_edge(6, 3));
    assert_eq!(working.find_root(), 3);
}

#[test]
fn malformed_rows_are_rejected() {
    let mut rows = chain(3, 1.0);
    rows.push(arbor_core::NodeRow::from((9, None, 0.0, 0.0, 0.0)));
    let err = Tree::from_rows(rows).expect_err("two roots");
    assert_eq!(
        err,
        ArborError::Tree(TreeError::MultipleRoots { first: 1, second: 9 })
    );

    let tree = Tree::from_rows(chain(3, 1.0)).expect("chain is valid");
    assert_eq!(
        tree.clone().simplify(&[]).expect_err("no keepers"),
        ArborError::Argument(ArgumentError::EmptyNodeSet {
            operation: "simplify"
        })
    );
    assert_eq!(
        tree.find_common_ancestor(&[], None, None)
            .expect_err("no nodes"),
        ArborError::Argument(ArgumentError::EmptyNodeSet {
            operation: "find_common_ancestor"
        })
    );
}

#[test]
fn structural_operations_are_instrumented() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let mut tree = Tree::from_rows(chain(5, 10.0)).expect("chain is valid");
    tracing::subscriber::with_default(subscriber, || {
        tree.spanning_tree(&[2, 4]).expect("nodes are known");
        tree.simplify(&[1, 5]).expect("keepers are known");
    });

    let simplify = layer.spans_named("tree.simplify");
    assert_eq!(simplify.len(), 1);
    assert_eq!(simplify[0].field("nodes"), Some("5"));
    assert_eq!(simplify[0].field("keepers"), Some("2"));
    assert_eq!(layer.spans_named("tree.spanning_tree").len(), 1);
}
