//! Unit tests for synapse-flow configuration and clustering.

use std::collections::HashSet;

use arbor_test_support::tracing::RecordingLayer;
use proptest::prelude::*;
use rstest::{fixture, rstest};
use tracing_subscriber::layer::SubscriberExt;

use crate::{
    ArborError, ArgumentError, NodeRow, SpatialGraph, Tree,
    skeleton::{Skeleton, SynapseRow},
    test_utils::suite_proptest_config,
};

use super::{ExecutionStrategy, SynapseFlow, SynapseFlowBuilder, SynapseGroup};

/// Two arms of 1 µm segments joined at the root:
///
/// ```text
/// 6 - 5 - 4 - 1 - 2 - 3
///                 |
///                 7
/// ```
#[fixture]
fn arms() -> Skeleton {
    let nodes = vec![
        NodeRow::from((1, None, 0.0, 0.0, 0.0)),
        NodeRow::from((2, Some(1), 1_000.0, 0.0, 0.0)),
        NodeRow::from((3, Some(2), 2_000.0, 0.0, 0.0)),
        NodeRow::from((4, Some(1), -1_000.0, 0.0, 0.0)),
        NodeRow::from((5, Some(4), -2_000.0, 0.0, 0.0)),
        NodeRow::from((6, Some(5), -3_000.0, 0.0, 0.0)),
        NodeRow::from((7, Some(2), 1_000.0, 1_000.0, 0.0)),
    ];
    let synapses = vec![
        SynapseRow::presynaptic(3, 30),
        SynapseRow::presynaptic(7, 70),
        SynapseRow::postsynaptic(5, 50),
        SynapseRow::postsynaptic(6, 60),
        SynapseRow::postsynaptic(6, 61),
    ];
    Skeleton::new(nodes, synapses)
}

fn flow(bandwidths: &[f64], strategy: ExecutionStrategy) -> SynapseFlow {
    SynapseFlowBuilder::new()
        .with_bandwidths(bandwidths.iter().copied())
        .with_execution_strategy(strategy)
        .build()
        .expect("configuration is valid")
}

#[rstest]
#[case::empty(&[], ArgumentError::EmptyBandwidths)]
#[case::zero(&[1.0, 0.0], ArgumentError::InvalidBandwidth { value: 0.0 })]
#[case::negative(&[-2.0], ArgumentError::InvalidBandwidth { value: -2.0 })]
#[case::infinite(&[f64::INFINITY], ArgumentError::InvalidBandwidth { value: f64::INFINITY })]
fn builder_rejects_bad_bandwidths(#[case] bandwidths: &[f64], #[case] expected: ArgumentError) {
    let err = SynapseFlowBuilder::new()
        .with_bandwidths(bandwidths.iter().copied())
        .build()
        .expect_err("bandwidths must be rejected");
    assert_eq!(err, ArborError::Argument(expected));
}

#[test]
fn builder_rejects_nan_bandwidth() {
    let err = SynapseFlowBuilder::new()
        .with_bandwidths([f64::NAN])
        .build()
        .expect_err("NaN must be rejected");
    assert!(matches!(
        err,
        ArborError::Argument(ArgumentError::InvalidBandwidth { value }) if value.is_nan()
    ));
}

#[rstest]
fn groups_split_by_arm(arms: Skeleton) {
    let clustering = flow(&[500.0], ExecutionStrategy::Sequential)
        .run_skeleton(&arms)
        .expect("skeleton is valid");
    let result = &clustering.per_bandwidth()[0];
    assert_eq!(result.bandwidth(), 500.0);
    let groups = result.groups();
    assert_eq!(groups.len(), 4, "each isolated site is its own peak");
    assert_eq!(groups[0].node_ids().collect::<Vec<_>>(), vec![3]);
    assert_eq!(groups[3].connector_ids().collect::<Vec<_>>(), vec![60, 61]);
    assert_eq!(result.group_of(6), Some(3));
    assert_eq!(result.group_of(1), None);
}

#[rstest]
fn every_row_lands_in_exactly_one_group(arms: Skeleton) {
    let clustering = flow(&[200.0, 1_500.0, 4_000.0, 50_000.0], ExecutionStrategy::Sequential)
        .run_skeleton(&arms)
        .expect("skeleton is valid");
    assert_eq!(clustering.len(), 4);
    for result in &clustering {
        let mut members: Vec<SynapseRow> = result
            .groups()
            .iter()
            .flat_map(|group| group.members().iter())
            .map(|member| SynapseRow::new(member.node, member.connector, member.role))
            .collect();
        members.sort_by_key(|row| row.connector);
        let mut expected = arms.synapses.clone();
        expected.sort_by_key(|row| row.connector);
        assert_eq!(members, expected, "bandwidth {}", result.bandwidth());
        assert!(result.groups().iter().all(|group| !group.is_empty()));
    }
}

#[rstest]
fn wide_bandwidth_merges_arms(arms: Skeleton) {
    let clustering = flow(&[1_500.0, 20_000.0], ExecutionStrategy::Sequential)
        .run_skeleton(&arms)
        .expect("skeleton is valid");
    let medium = &clustering.per_bandwidth()[0];
    assert_eq!(medium.groups().len(), 2, "one group per arm");
    assert_eq!(medium.group_of(3), medium.group_of(7));
    assert_eq!(medium.group_of(5), medium.group_of(6));
    assert_ne!(medium.group_of(3), medium.group_of(5));
    let wide = &clustering.per_bandwidth()[1];
    assert_eq!(wide.groups().len(), 1);
    assert_eq!(wide.groups()[0].len(), arms.synapses.len());
}

#[rstest]
fn strategies_agree(arms: Skeleton) {
    let bandwidths = [300.0, 1_500.0, 20_000.0];
    let sequential = flow(&bandwidths, ExecutionStrategy::Sequential)
        .run_skeleton(&arms)
        .expect("valid");
    let auto = flow(&bandwidths, ExecutionStrategy::Auto)
        .run_skeleton(&arms)
        .expect("valid");
    assert_eq!(sequential, auto);
    let order: Vec<f64> = auto.iter().map(super::BandwidthGroups::bandwidth).collect();
    assert_eq!(order, bandwidths);
}

#[cfg(feature = "parallel")]
#[rstest]
fn parallel_matches_sequential(arms: Skeleton) {
    let bandwidths = [300.0, 1_500.0, 20_000.0];
    let sequential = flow(&bandwidths, ExecutionStrategy::Sequential)
        .run_skeleton(&arms)
        .expect("valid");
    let parallel = flow(&bandwidths, ExecutionStrategy::Parallel)
        .run_skeleton(&arms)
        .expect("valid");
    assert_eq!(sequential, parallel);
}

#[cfg(not(feature = "parallel"))]
#[rstest]
fn parallel_requires_the_feature(arms: Skeleton) {
    let err = flow(&[1_000.0], ExecutionStrategy::Parallel)
        .run_skeleton(&arms)
        .expect_err("parallel backend is not compiled in");
    assert_eq!(
        err,
        ArborError::BackendUnavailable {
            requested: ExecutionStrategy::Parallel
        }
    );
}

#[rstest]
fn unknown_synapse_node_is_rejected(mut arms: Skeleton) {
    arms.synapses.push(SynapseRow::presynaptic(99, 990));
    let err = flow(&[1_000.0], ExecutionStrategy::Sequential)
        .run_skeleton(&arms)
        .expect_err("node 99 is not in the tree");
    assert_eq!(
        err,
        ArborError::Argument(ArgumentError::UnknownSynapseNode {
            node: 99,
            connector: 990
        })
    );
}

#[rstest]
fn repeated_rows_do_not_add_density(arms: Skeleton) {
    // Node 6 already carries two rows. Adding more rows for it must not pull
    // node 5 into its group, as a heavier weight on node 6 would.
    let mut heavy = arms.clone();
    for connector in 600..620 {
        heavy.synapses.push(SynapseRow::postsynaptic(6, connector));
    }
    let runner = flow(&[700.0], ExecutionStrategy::Sequential);
    let base = runner.run_skeleton(&arms).expect("valid");
    let weighted = runner.run_skeleton(&heavy).expect("valid");
    let representatives = |clustering: &super::SynapseClustering| {
        clustering.per_bandwidth()[0]
            .groups()
            .iter()
            .map(SynapseGroup::representative)
            .collect::<Vec<_>>()
    };
    assert_eq!(representatives(&base), representatives(&weighted));
}

#[test]
fn no_synapses_yields_empty_groups() {
    let tree = Tree::from_rows([NodeRow::from((1, None, 0.0, 0.0, 0.0))]).expect("valid");
    let graph = SpatialGraph::from_tree(&tree);
    let clustering = flow(&[10.0, 20.0], ExecutionStrategy::Sequential)
        .cluster(&graph, &[])
        .expect("valid");
    assert_eq!(clustering.len(), 2);
    assert!(clustering.iter().all(|result| result.groups().is_empty()));
}

#[rstest]
fn cluster_emits_spans(arms: Skeleton) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        flow(&[500.0, 5_000.0], ExecutionStrategy::Sequential)
            .run_skeleton(&arms)
            .expect("valid");
    });

    let cluster = layer.spans_named("synapse_flow.cluster");
    assert_eq!(cluster.len(), 1);
    assert_eq!(cluster[0].field("nodes"), Some("7"));
    assert_eq!(cluster[0].field("synapses"), Some("5"));
    assert_eq!(cluster[0].field("bandwidths"), Some("2"));

    let bandwidths: Vec<String> = layer
        .spans_named("synapse_flow.bandwidth")
        .iter()
        .filter_map(|span| span.field("bandwidth").map(str::to_owned))
        .collect();
    assert_eq!(bandwidths, vec!["500".to_owned(), "5000".to_owned()]);
    assert_eq!(layer.events_with_message("synapse clustering completed").len(), 1);
}

#[rstest]
fn failures_are_logged_on_the_span(mut arms: Skeleton) {
    arms.synapses.push(SynapseRow::postsynaptic(404, 1));
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let result = tracing::subscriber::with_default(subscriber, || {
        flow(&[500.0], ExecutionStrategy::Sequential).run_skeleton(&arms)
    });
    assert!(result.is_err());
    let errors: Vec<_> = layer
        .events()
        .into_iter()
        .filter(|event| event.level == tracing::Level::ERROR)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0]
            .field("error")
            .is_some_and(|message| message.contains("404"))
    );
}

fn random_skeleton() -> impl Strategy<Value = (Skeleton, Vec<f64>)> {
    (2_usize..48)
        .prop_flat_map(|size| {
            (
                prop::collection::vec(any::<prop::sample::Index>(), size - 1),
                prop::collection::vec((0.0..5_000.0_f64, 0.0..5_000.0_f64), size),
                prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 1..24),
                prop::collection::vec(10.0..20_000.0_f64, 1..4),
            )
        })
        .prop_map(|(parents, coords, synapses, bandwidths)| {
            let nodes = coords
                .iter()
                .enumerate()
                .map(|(index, &(x, y))| {
                    let parent = index
                        .checked_sub(1)
                        .map(|_| parents[index - 1].index(index) as u64);
                    NodeRow::from((index as u64, parent, x, y, 0.0))
                })
                .collect::<Vec<_>>();
            let synapses = synapses
                .iter()
                .zip(0_u64..)
                .map(|(&(site, presynaptic), connector)| {
                    let node = site.index(nodes.len()) as u64;
                    if presynaptic {
                        SynapseRow::presynaptic(node, connector)
                    } else {
                        SynapseRow::postsynaptic(node, connector)
                    }
                })
                .collect();
            (Skeleton::new(nodes, synapses), bandwidths)
        })
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn every_synapse_is_grouped_once((skeleton, bandwidths) in random_skeleton()) {
        let clustering = flow(&bandwidths, ExecutionStrategy::Auto)
            .run_skeleton(&skeleton)
            .expect("generated skeletons are valid");
        prop_assert_eq!(clustering.len(), bandwidths.len());
        let distinct: HashSet<u64> = skeleton.synapses.iter().map(|row| row.node).collect();
        for result in &clustering {
            let mut connectors: Vec<u64> = result
                .groups()
                .iter()
                .flat_map(SynapseGroup::connector_ids)
                .collect();
            connectors.sort_unstable();
            let expected: Vec<u64> = (0..skeleton.synapses.len() as u64).collect();
            prop_assert_eq!(connectors, expected);
            prop_assert!(result.groups().len() <= distinct.len());
            for node in &distinct {
                let owners = result
                    .groups()
                    .iter()
                    .filter(|group| group.node_ids().any(|member| member == *node))
                    .count();
                prop_assert_eq!(owners, 1, "node {} at bandwidth {}", node, result.bandwidth());
            }
        }
    }
}
