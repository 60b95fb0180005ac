//! Geodesic Gaussian kernel density over the tree.

use crate::graph::SpatialGraph;

/// Geodesic distances from every distinct synapse node to every node.
///
/// Built once per clustering request and shared read-only by every
/// bandwidth, since the distances do not depend on the bandwidth.
#[derive(Debug)]
pub(super) struct DistanceTable {
    rows: Vec<Vec<f64>>,
    nodes: usize,
}

impl DistanceTable {
    /// Runs one shortest-path pass per source.
    pub(super) fn build(graph: &SpatialGraph, sources: &[usize]) -> Self {
        let rows = sources
            .iter()
            .map(|&source| graph.distances_from(source))
            .collect();
        super::telemetry::record_shortest_path_passes(sources.len());
        Self {
            rows,
            nodes: graph.len(),
        }
    }

    pub(super) fn node_count(&self) -> usize {
        self.nodes
    }
}

/// Density field for a single bandwidth, evaluated on demand.
///
/// `density(n) = Σ_s exp(-D[s][n]² / h²)`; unreachable nodes contribute
/// `exp(-∞) = 0`.
#[derive(Debug)]
pub(super) struct DensityField<'a> {
    table: &'a DistanceTable,
    bandwidth: f64,
    cache: Vec<Option<f64>>,
}

impl<'a> DensityField<'a> {
    pub(super) fn new(table: &'a DistanceTable, bandwidth: f64) -> Self {
        Self {
            table,
            bandwidth,
            cache: vec![None; table.node_count()],
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "Kernel density evaluation requires floating-point arithmetic."
    )]
    pub(super) fn at(&mut self, node: usize) -> f64 {
        if let Some(value) = self.cache[node] {
            return value;
        }
        let value = self
            .table
            .rows
            .iter()
            .map(|row| (-(row[node] / self.bandwidth).powi(2)).exp())
            .sum();
        self.cache[node] = Some(value);
        value
    }
}
