//! Density hill climbing and grouping of synapse rows.

use std::collections::HashMap;

use crate::{graph::SpatialGraph, skeleton::SynapseRow};

use super::{
    density::DensityField,
    result::{SynapseGroup, SynapseMember},
};

/// Greedy ascent over a [`DensityField`] with per-call memoisation.
///
/// Each step moves to the neighbour with the highest density, provided it is
/// strictly higher than the current node's; the first such neighbour in
/// graph order wins ties. A walk stops at a local maximum or at a node whose
/// destination is already known, and every node on the walk remembers the
/// destination.
pub(super) struct HillClimb<'a> {
    graph: &'a SpatialGraph,
    field: DensityField<'a>,
    destinations: Vec<Option<usize>>,
    steps: usize,
}

impl<'a> HillClimb<'a> {
    pub(super) fn new(graph: &'a SpatialGraph, field: DensityField<'a>) -> Self {
        Self {
            graph,
            field,
            destinations: vec![None; graph.len()],
            steps: 0,
        }
    }

    /// Moves taken so far, across every walk.
    pub(super) fn steps(&self) -> usize {
        self.steps
    }

    pub(super) fn destination(&mut self, start: usize) -> usize {
        if let Some(known) = self.destinations[start] {
            return known;
        }
        let mut path = vec![start];
        let mut current = start;
        let found = loop {
            let next = self.steepest_neighbour(current);
            if next == current {
                break current;
            }
            self.steps += 1;
            if let Some(known) = self.destinations[next] {
                break known;
            }
            path.push(next);
            current = next;
        };
        for node in path {
            self.destinations[node] = Some(found);
        }
        found
    }

    fn steepest_neighbour(&mut self, node: usize) -> usize {
        let mut best = node;
        let mut best_density = self.field.at(node);
        for &(neighbour, _) in self.graph.adjacent(node) {
            let density = self.field.at(neighbour);
            if density > best_density {
                best = neighbour;
                best_density = density;
            }
        }
        best
    }
}

/// Groups `rows` by hill-climb destination.
///
/// `row_nodes[i]` is the dense index of `rows[i].node`. Groups appear in
/// order of their first row; members keep row order.
pub(super) fn group_rows(
    climb: &mut HillClimb<'_>,
    rows: &[SynapseRow],
    row_nodes: &[usize],
) -> Vec<SynapseGroup> {
    let mut slot_of: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<SynapseGroup> = Vec::new();
    for (row, &node) in rows.iter().zip(row_nodes) {
        let destination = climb.destination(node);
        let slot = *slot_of.entry(destination).or_insert_with(|| {
            groups.push(SynapseGroup::new(climb.graph.id_at(destination), Vec::new()));
            groups.len() - 1
        });
        groups[slot].push(SynapseMember::from(*row));
    }
    groups
}
