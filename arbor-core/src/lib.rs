//! Arbor core library.
//!
//! Topology algorithms for rooted neuron skeletons and geodesic
//! synapse clustering on top of them:
//!
//! - [`Tree`] validates `(node, parent, x, y, z)` rows and provides root
//!   discovery, hop counts, lowest common ancestors, re-rooting, keeper
//!   reduction, leaf-to-branch partitioning, spanning subtrees and cable
//!   length.
//! - [`SpatialGraph`] is the undirected, Euclidean-weighted view used for
//!   geodesic distances.
//! - [`SynapseFlow`] clusters synapse rows by hill climbing a Gaussian
//!   kernel density for each configured bandwidth, and
//!   [`segregation_index`] scores how cleanly the resulting groups separate
//!   inputs from outputs.
//!
//! # Examples
//! ```
//! use arbor_core::{NodeRow, Skeleton, SynapseFlowBuilder, SynapseRow};
//!
//! let nodes = (1..=7)
//!     .map(|id| NodeRow::from((id, (id > 1).then(|| id - 1), 0.0, 0.0, id as f64 * 500.0)))
//!     .collect();
//! let skeleton = Skeleton::new(
//!     nodes,
//!     vec![SynapseRow::postsynaptic(3, 100), SynapseRow::presynaptic(5, 200)],
//! );
//! let tree = skeleton.tree()?;
//! assert_eq!(tree.find_common_ancestor(&[3, 5], None, None)?, (3, 3));
//!
//! let flow = SynapseFlowBuilder::new().with_bandwidths([10_000.0]).build()?;
//! let clustering = flow.run_skeleton(&skeleton)?;
//! let groups = clustering.per_bandwidth()[0].groups();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].representative(), 4);
//! # Ok::<(), arbor_core::ArborError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod flow;
mod geometry;
mod graph;
mod skeleton;
mod tree;

#[cfg(test)]
mod test_utils;

pub use crate::{
    error::{
        ArborError, ArborErrorCode, ArgumentError, ArgumentErrorCode, Result, TreeError,
        TreeErrorCode,
    },
    flow::{
        BandwidthGroups, ExecutionStrategy, SegregationWeights, SynapseClustering, SynapseFlow,
        SynapseFlowBuilder, SynapseGroup, SynapseMember, TargetCounts, segregation_index,
    },
    geometry::Point3,
    graph::SpatialGraph,
    skeleton::{ConnectorId, Skeleton, SynapseRole, SynapseRow},
    tree::{NodeId, NodeRow, Partition, ReducedTree, RootDistances, Tree},
};
