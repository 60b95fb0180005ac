//! Skeleton builders shared by the integration tests.

use arbor_core::{NodeId, NodeRow, Skeleton, SynapseRow};

/// Linear chain `1 - 2 - ... - len` along the z axis, rooted at `1`, with
/// `spacing` nanometres between consecutive nodes.
#[must_use]
pub fn chain(len: NodeId, spacing: f64) -> Vec<NodeRow> {
    (1..=len)
        .map(|id| NodeRow::from((id, (id > 1).then(|| id - 1), 0.0, 0.0, id as f64 * spacing)))
        .collect()
}

/// The seven-node chain with a postsynaptic site on node 3 (connector 100)
/// and a presynaptic site on node 6 (connector 200).
#[must_use]
pub fn seven_node_scenario() -> Skeleton {
    Skeleton::new(
        chain(7, 1_000.0),
        vec![
            SynapseRow::postsynaptic(3, 100),
            SynapseRow::presynaptic(6, 200),
        ],
    )
}

/// A fork whose left arm carries only outputs and whose right arm carries
/// only inputs:
///
/// ```text
///          1
///        /   \
///       2     5
///       |     |
///       3     6
///       |     |
///       4     7
/// ```
#[must_use]
pub fn segregated_fork() -> Skeleton {
    let nodes = vec![
        NodeRow::from((1, None, 0.0, 0.0, 0.0)),
        NodeRow::from((2, Some(1), -1_000.0, 0.0, 0.0)),
        NodeRow::from((3, Some(2), -2_000.0, 0.0, 0.0)),
        NodeRow::from((4, Some(3), -3_000.0, 0.0, 0.0)),
        NodeRow::from((5, Some(1), 1_000.0, 0.0, 0.0)),
        NodeRow::from((6, Some(5), 2_000.0, 0.0, 0.0)),
        NodeRow::from((7, Some(6), 3_000.0, 0.0, 0.0)),
    ];
    let synapses = vec![
        SynapseRow::presynaptic(3, 10),
        SynapseRow::presynaptic(4, 11),
        SynapseRow::postsynaptic(6, 20),
        SynapseRow::postsynaptic(7, 21),
        SynapseRow::postsynaptic(7, 22),
    ];
    Skeleton::new(nodes, synapses)
}
