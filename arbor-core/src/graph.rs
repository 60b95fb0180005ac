//! Undirected, Euclidean-weighted view of a [`Tree`].
//!
//! The clustering engine walks the tree without regard to direction, so it
//! works on this adjacency list instead of the parent/child arena. Dense
//! indices match the tree's, which keeps per-node tables in plain vectors.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use crate::{
    Result,
    error::ArgumentError,
    tree::{NodeId, Tree},
};

/// Adjacency-list view of a tree with Euclidean edge weights.
///
/// The neighbours of a node are listed with its parent first, when it has
/// one, followed by its children in child order. Hill climbing relies on
/// this order to break density ties deterministically.
///
/// # Examples
///
/// ```
/// use arbor_core::{NodeRow, SpatialGraph, Tree};
///
/// let tree = Tree::from_rows([
///     NodeRow::from((1, None, 0.0, 0.0, 0.0)),
///     NodeRow::from((2, Some(1), 3.0, 4.0, 0.0)),
///     NodeRow::from((3, Some(2), 3.0, 4.0, 2.0)),
/// ])?;
/// let graph = SpatialGraph::from_tree(&tree);
/// let distances = graph.shortest_paths(1)?;
/// assert_eq!(distances[&3], 7.0);
/// assert_eq!(graph.neighbours(2)?, vec![(1, 5.0), (3, 2.0)]);
/// # Ok::<(), arbor_core::ArborError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SpatialGraph {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl SpatialGraph {
    /// Builds the weighted view of `tree` in its current orientation.
    #[must_use]
    pub fn from_tree(tree: &Tree) -> Self {
        let adjacency = (0..tree.len())
            .map(|node| {
                let here = tree.location_at(node);
                tree.parent_index(node)
                    .into_iter()
                    .chain(tree.child_indices(node).iter().copied())
                    .map(|other| (other, here.distance(&tree.location_at(other))))
                    .collect()
            })
            .collect();
        let ids: Vec<NodeId> = tree.node_ids().collect();
        let index = ids
            .iter()
            .enumerate()
            .map(|(position, &id)| (id, position))
            .collect();
        Self {
            ids,
            index,
            adjacency,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `true` when `node` is part of the graph.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    /// Sum of all edge weights, equal to the source tree's cable length.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(node, edges)| {
                edges
                    .iter()
                    .filter(move |&&(other, _)| other > node)
                    .map(|&(_, weight)| weight)
            })
            .sum()
    }

    /// Neighbours of `node` with their edge weights, parent first.
    ///
    /// # Errors
    /// Returns [`ArgumentError::UnknownNode`] when `node` is not in the graph.
    pub fn neighbours(&self, node: NodeId) -> Result<Vec<(NodeId, f64)>> {
        let index = self.index_of(node)?;
        Ok(self.adjacency[index]
            .iter()
            .map(|&(other, weight)| (self.ids[other], weight))
            .collect())
    }

    /// Geodesic distance from `source` to every node.
    ///
    /// Nodes that cannot be reached map to [`f64::INFINITY`]; a graph built
    /// from a validated tree is always connected, so this only happens for
    /// hand-assembled inputs.
    ///
    /// # Errors
    /// Returns [`ArgumentError::UnknownNode`] when `source` is not in the graph.
    pub fn shortest_paths(&self, source: NodeId) -> Result<HashMap<NodeId, f64>> {
        let start = self.index_of(source)?;
        Ok(self
            .distances_from(start)
            .into_iter()
            .enumerate()
            .map(|(index, distance)| (self.ids[index], distance))
            .collect())
    }

    /// Dijkstra over dense indices.
    #[expect(
        clippy::float_arithmetic,
        reason = "Path lengths accumulate floating-point edge weights."
    )]
    pub(crate) fn distances_from(&self, start: usize) -> Vec<f64> {
        let mut distances = vec![f64::INFINITY; self.len()];
        let mut heap = BinaryHeap::new();
        distances[start] = 0.0;
        heap.push(Frontier {
            distance: 0.0,
            node: start,
        });
        while let Some(Frontier { distance, node }) = heap.pop() {
            if distance > distances[node] {
                continue;
            }
            for &(other, weight) in &self.adjacency[node] {
                let candidate = distance + weight;
                if candidate < distances[other] {
                    distances[other] = candidate;
                    heap.push(Frontier {
                        distance: candidate,
                        node: other,
                    });
                }
            }
        }
        distances
    }

    pub(crate) fn index_of(&self, node: NodeId) -> Result<usize> {
        self.index
            .get(&node)
            .copied()
            .ok_or_else(|| ArgumentError::UnknownNode { node }.into())
    }

    pub(crate) fn id_at(&self, index: usize) -> NodeId {
        self.ids[index]
    }

    pub(crate) fn adjacent(&self, index: usize) -> &[(usize, f64)] {
        &self.adjacency[index]
    }
}

/// Heap entry ordered so that [`BinaryHeap`] pops the nearest node first.
#[derive(Clone, Copy, Debug)]
struct Frontier {
    distance: f64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
