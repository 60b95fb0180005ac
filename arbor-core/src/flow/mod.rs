//! Synapse-flow clustering.
//!
//! Synapse nodes are grouped by geodesic kernel density: for every bandwidth
//! `h`, each node of the tree receives `Σ_s exp(-D(s, n)² / h²)` over the
//! distinct synapse nodes `s`, and every synapse climbs that field to a local
//! maximum. Synapses sharing a maximum form one [`SynapseGroup`].
//!
//! The shortest-path distances are computed once per request and shared by
//! every bandwidth; each bandwidth then runs as an independent unit of work,
//! on the `rayon` pool when [`ExecutionStrategy`] allows it.

mod builder;
mod climb;
mod density;
mod result;
mod segregation;
mod telemetry;

use std::time::Instant;

use tracing::{Span, debug, info, info_span, instrument};

use crate::{
    ArborError, Result,
    error::ArgumentError,
    graph::SpatialGraph,
    skeleton::{Skeleton, SynapseRow},
};

use self::{
    climb::{HillClimb, group_rows},
    density::{DensityField, DistanceTable},
};

pub use self::{
    builder::SynapseFlowBuilder,
    result::{BandwidthGroups, SynapseClustering, SynapseGroup, SynapseMember},
    segregation::{SegregationWeights, TargetCounts, segregation_index},
};

/// Indicates how [`SynapseFlow`] schedules the per-bandwidth work.
///
/// `Auto` resolves deterministically: it runs in parallel when the
/// `parallel` feature is compiled in and sequentially otherwise. Results are
/// identical under every strategy.
///
/// # Examples
/// ```
/// use arbor_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Auto;
/// assert!(matches!(strategy, ExecutionStrategy::Auto));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Allow the library to select a scheduler automatically.
    Auto,
    /// Evaluate bandwidths one after another on the calling thread.
    Sequential,
    /// Evaluate bandwidths concurrently on the `rayon` pool.
    Parallel,
}

/// Clusters synapses for a fixed list of bandwidths.
///
/// Construct through [`SynapseFlowBuilder`].
#[derive(Debug, Clone)]
pub struct SynapseFlow {
    bandwidths: Vec<f64>,
    execution_strategy: ExecutionStrategy,
}

/// Dense indices of the synapse rows, resolved once per request.
struct SynapseSites {
    /// Index of each row's node, parallel to the input rows.
    row_nodes: Vec<usize>,
    /// Distinct synapse nodes in order of first appearance.
    distinct: Vec<usize>,
}

impl SynapseSites {
    fn resolve(graph: &SpatialGraph, rows: &[SynapseRow]) -> Result<Self> {
        let mut row_nodes = Vec::with_capacity(rows.len());
        let mut distinct = Vec::new();
        let mut seen = vec![false; graph.len()];
        for row in rows {
            let index = graph.index_of(row.node).map_err(|_| {
                ArborError::from(ArgumentError::UnknownSynapseNode {
                    node: row.node,
                    connector: row.connector,
                })
            })?;
            row_nodes.push(index);
            if !seen[index] {
                seen[index] = true;
                distinct.push(index);
            }
        }
        Ok(Self {
            row_nodes,
            distinct,
        })
    }
}

impl SynapseFlow {
    pub(crate) fn new(bandwidths: Vec<f64>, execution_strategy: ExecutionStrategy) -> Self {
        Self {
            bandwidths,
            execution_strategy,
        }
    }

    /// Bandwidths evaluated by every run, in reporting order.
    #[must_use]
    pub fn bandwidths(&self) -> &[f64] {
        &self.bandwidths
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Clusters `synapses` on `graph` for every configured bandwidth.
    ///
    /// Every row appears in exactly one group per bandwidth. Nodes carrying
    /// several rows contribute to the density once.
    ///
    /// # Errors
    /// Returns [`ArgumentError::UnknownSynapseNode`] when a row names a node
    /// outside `graph`, and [`ArborError::BackendUnavailable`] when
    /// [`ExecutionStrategy::Parallel`] is requested without the `parallel`
    /// feature.
    ///
    /// # Examples
    /// ```
    /// use arbor_core::{NodeRow, SpatialGraph, SynapseFlowBuilder, SynapseRow, Tree};
    ///
    /// let tree = Tree::from_rows((1..=7).map(|id| {
    ///     NodeRow::from((id, (id > 1).then(|| id - 1), id as f64 * 1_000.0, 0.0, 0.0))
    /// }))?;
    /// let graph = SpatialGraph::from_tree(&tree);
    /// let flow = SynapseFlowBuilder::new().with_bandwidths([100.0]).build()?;
    /// let clustering = flow.cluster(
    ///     &graph,
    ///     &[SynapseRow::postsynaptic(3, 100), SynapseRow::presynaptic(6, 200)],
    /// )?;
    /// let groups = clustering.per_bandwidth()[0].groups();
    /// assert_eq!(groups.len(), 2);
    /// assert_eq!(groups[0].representative(), 3);
    /// # Ok::<(), arbor_core::ArborError>(())
    /// ```
    #[instrument(
        name = "synapse_flow.cluster",
        err,
        skip_all,
        fields(nodes = graph.len(), synapses = synapses.len(), bandwidths = self.bandwidths.len())
    )]
    pub fn cluster(&self, graph: &SpatialGraph, synapses: &[SynapseRow]) -> Result<SynapseClustering> {
        self.ensure_backend()?;
        let sites = SynapseSites::resolve(graph, synapses)?;
        let table = DistanceTable::build(graph, &sites.distinct);
        debug!(sites = sites.distinct.len(), "geodesic distances computed");

        let parent = Span::current();
        let run = |bandwidth: f64| {
            let span = info_span!(parent: &parent, "synapse_flow.bandwidth", bandwidth);
            let _entered = span.enter();
            cluster_bandwidth(graph, &table, &sites, synapses, bandwidth)
        };
        let per_bandwidth = self.map_bandwidths(run);
        info!(
            groups = per_bandwidth.iter().map(|result| result.groups().len()).sum::<usize>(),
            "synapse clustering completed"
        );
        Ok(SynapseClustering::new(per_bandwidth))
    }

    /// Builds the tree and its weighted view from `skeleton`, then clusters
    /// its synapses.
    ///
    /// # Errors
    /// Propagates tree validation errors and the errors of
    /// [`SynapseFlow::cluster`].
    pub fn run_skeleton(&self, skeleton: &Skeleton) -> Result<SynapseClustering> {
        let tree = skeleton.tree()?;
        let graph = SpatialGraph::from_tree(&tree);
        self.cluster(&graph, &skeleton.synapses)
    }

    fn ensure_backend(&self) -> Result<()> {
        match self.execution_strategy {
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Parallel => Err(ArborError::BackendUnavailable {
                requested: ExecutionStrategy::Parallel,
            }),
            _ => Ok(()),
        }
    }

    fn map_bandwidths<F>(&self, run: F) -> Vec<BandwidthGroups>
    where
        F: Fn(f64) -> BandwidthGroups + Sync,
    {
        match self.execution_strategy {
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Auto | ExecutionStrategy::Parallel => {
                use rayon::prelude::*;

                self.bandwidths.par_iter().map(|&bandwidth| run(bandwidth)).collect()
            }
            _ => self.bandwidths.iter().map(|&bandwidth| run(bandwidth)).collect(),
        }
    }
}

fn cluster_bandwidth(
    graph: &SpatialGraph,
    table: &DistanceTable,
    sites: &SynapseSites,
    rows: &[SynapseRow],
    bandwidth: f64,
) -> BandwidthGroups {
    let started = Instant::now();
    let mut climb = HillClimb::new(graph, DensityField::new(table, bandwidth));
    let groups = group_rows(&mut climb, rows, &sites.row_nodes);
    telemetry::record_hill_climb_steps(climb.steps());
    telemetry::record_bandwidth_latency(started.elapsed());
    debug!(
        groups = groups.len(),
        steps = climb.steps(),
        "bandwidth clustered"
    );
    BandwidthGroups::new(bandwidth, groups)
}

#[cfg(test)]
mod tests;
