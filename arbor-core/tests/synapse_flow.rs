//! End-to-end clustering and segregation through the public API.

mod common;

use arbor_core::{
    ArborError, ExecutionStrategy, SegregationWeights, SynapseFlowBuilder, SynapseGroup,
    SynapseMember, SynapseRole, SynapseRow, TargetCounts, segregation_index,
};
use rstest::rstest;

use common::{segregated_fork, seven_node_scenario};

fn member(node: u64, connector: u64, role: SynapseRole) -> SynapseMember {
    SynapseMember::from(SynapseRow::new(node, connector, role))
}

#[rstest]
#[case::sequential(ExecutionStrategy::Sequential)]
#[case::auto(ExecutionStrategy::Auto)]
fn seven_node_scenario_splits_roles(#[case] strategy: ExecutionStrategy) {
    let skeleton = seven_node_scenario();
    let clustering = SynapseFlowBuilder::new()
        .with_bandwidths([500.0])
        .with_execution_strategy(strategy)
        .build()
        .expect("bandwidth is valid")
        .run_skeleton(&skeleton)
        .expect("skeleton is valid");

    let groups = clustering.per_bandwidth()[0].groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].representative(), 3);
    assert_eq!(groups[0].connector_ids().collect::<Vec<_>>(), vec![100]);
    assert_eq!(groups[1].representative(), 6);
    assert_eq!(
        groups[1].roles().collect::<Vec<_>>(),
        vec![SynapseRole::Presynaptic]
    );
    let score = segregation_index(groups, SegregationWeights::Uniform).expect("mixed arbor");
    assert!((score - 1.0).abs() < f64::EPSILON);
}

#[test]
fn segregated_arms_score_one_and_merged_arms_score_zero() {
    let skeleton = segregated_fork();
    let clustering = SynapseFlowBuilder::new()
        .with_bandwidths([1_500.0, 20_000.0])
        .build()
        .expect("bandwidths are valid")
        .run_skeleton(&skeleton)
        .expect("skeleton is valid");

    let split = &clustering.per_bandwidth()[0];
    assert_eq!(split.groups().len(), 2);
    assert_eq!(split.groups()[0].representative(), 3);
    assert_eq!(split.groups()[1].representative(), 6);
    let score = segregation_index(split.groups(), SegregationWeights::Uniform).expect("mixed");
    assert!((score - 1.0).abs() < 1e-12);

    let merged = &clustering.per_bandwidth()[1];
    assert_eq!(merged.groups().len(), 1);
    assert_eq!(merged.groups()[0].representative(), 1);
    assert_eq!(merged.groups()[0].len(), skeleton.synapses.len());
    let score = segregation_index(merged.groups(), SegregationWeights::Uniform).expect("mixed");
    assert!(score.abs() < 1e-12);
}

#[test]
fn weighted_index_uses_target_counts() {
    let groups = vec![
        SynapseGroup::new(
            1,
            vec![
                member(1, 10, SynapseRole::Presynaptic),
                member(1, 20, SynapseRole::Postsynaptic),
            ],
        ),
        SynapseGroup::new(
            5,
            vec![
                member(5, 30, SynapseRole::Postsynaptic),
                member(6, 31, SynapseRole::Postsynaptic),
            ],
        ),
    ];
    let counts: TargetCounts = [(10, 4)].into_iter().collect();
    let uniform = segregation_index(&groups, SegregationWeights::Uniform).expect("mixed");
    let weighted =
        segregation_index(&groups, SegregationWeights::TargetCounts(&counts)).expect("mixed");
    assert!(uniform > 0.0 && uniform < 1.0);
    assert!(weighted > 0.0 && weighted < 1.0);
    assert!((uniform - weighted).abs() > 1e-6);
}

#[test]
fn single_role_arbor_is_degenerate() {
    let groups = vec![SynapseGroup::new(
        2,
        vec![
            member(2, 1, SynapseRole::Postsynaptic),
            member(3, 2, SynapseRole::Postsynaptic),
        ],
    )];
    let err = segregation_index(&groups, SegregationWeights::Uniform)
        .expect_err("one role only");
    assert!(matches!(
        err,
        ArborError::DegenerateSegregation { synapses: 2, fraction } if fraction == 0.0
    ));
}
