//! Reduction of a tree to a set of keeper nodes.
//!
//! The reduced tree keeps every keeper plus each branch point where the
//! root-ward walks of two or more keepers meet. Everything in between is
//! collapsed into a single undirected edge.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, instrument};

use crate::{Result, error::ArgumentError};

use super::{NodeId, Tree};

/// Undirected tree produced by [`Tree::simplify`].
///
/// Edges are stored in canonical `(smaller, larger)` form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReducedTree {
    nodes: BTreeSet<NodeId>,
    edges: BTreeSet<(NodeId, NodeId)>,
}

impl ReducedTree {
    fn with_nodes(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
            edges: BTreeSet::new(),
        }
    }

    fn add_edge(&mut self, left: NodeId, right: NodeId) {
        self.nodes.insert(left);
        self.nodes.insert(right);
        self.edges.insert(canonical(left, right));
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Edges in ascending canonical order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.iter().copied()
    }

    /// Number of nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Number of edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Returns `true` when `node` survived the reduction.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Returns `true` when `left` and `right` are joined, in either order.
    #[must_use]
    pub fn contains_edge(&self, left: NodeId, right: NodeId) -> bool {
        self.edges.contains(&canonical(left, right))
    }

    /// Nodes adjacent to `node`, in ascending id order.
    #[must_use]
    pub fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        let mut found: Vec<NodeId> = self
            .edges
            .iter()
            .filter_map(|&(left, right)| match (left == node, right == node) {
                (true, _) => Some(right),
                (_, true) => Some(left),
                _ => None,
            })
            .collect();
        found.sort_unstable();
        found
    }
}

const fn canonical(left: NodeId, right: NodeId) -> (NodeId, NodeId) {
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}

impl Tree {
    /// Reduces the tree to `keepers` and the branch points between them.
    ///
    /// The tree is first re-rooted, in place, at the first keeper. Each other
    /// keeper then walks towards that root until it reaches another keeper or
    /// a branch point already passed by an earlier walk. Branch points visited
    /// by more than one walk are kept; the rest are collapsed away.
    ///
    /// # Errors
    /// Returns [`ArgumentError::EmptyNodeSet`] when `keepers` is empty and
    /// [`ArgumentError::UnknownNode`] when a keeper is not in the tree. Both
    /// are detected before the tree is modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::{NodeRow, Tree};
    ///
    /// //     1
    /// //     |
    /// //     2
    /// //    / \
    /// //   3   4
    /// //   |   |
    /// //   5   6
    /// let mut tree = Tree::from_rows([
    ///     NodeRow::from((1, None, 0.0, 0.0, 0.0)),
    ///     NodeRow::from((2, Some(1), 0.0, 1.0, 0.0)),
    ///     NodeRow::from((3, Some(2), -1.0, 2.0, 0.0)),
    ///     NodeRow::from((4, Some(2), 1.0, 2.0, 0.0)),
    ///     NodeRow::from((5, Some(3), -1.0, 3.0, 0.0)),
    ///     NodeRow::from((6, Some(4), 1.0, 3.0, 0.0)),
    /// ])?;
    /// let reduced = tree.simplify(&[1, 5, 6])?;
    /// assert_eq!(reduced.nodes().collect::<Vec<_>>(), vec![1, 2, 5, 6]);
    /// assert!(reduced.contains_edge(1, 2));
    /// assert!(reduced.contains_edge(2, 5));
    /// assert!(reduced.contains_edge(2, 6));
    /// # Ok::<(), arbor_core::ArborError>(())
    /// ```
    #[instrument(
        name = "tree.simplify",
        err,
        skip(self, keepers),
        fields(nodes = self.len(), keepers = keepers.len())
    )]
    pub fn simplify(&mut self, keepers: &[NodeId]) -> Result<ReducedTree> {
        if keepers.is_empty() {
            return Err(ArgumentError::EmptyNodeSet {
                operation: "simplify",
            }
            .into());
        }
        let mut ordered = Vec::with_capacity(keepers.len());
        let mut keeper_set = HashSet::with_capacity(keepers.len());
        for &node in keepers {
            let index = self.index_of(node)?;
            if keeper_set.insert(index) {
                ordered.push(index);
            }
        }
        let Some((&anchor, rest)) = ordered.split_first() else {
            return Err(ArgumentError::EmptyNodeSet {
                operation: "simplify",
            }
            .into());
        };

        self.reroot_at(anchor);

        let mut visits: HashMap<usize, usize> = HashMap::new();
        let mut passed: HashSet<usize> = rest.iter().copied().collect();
        let mut paths = Vec::with_capacity(rest.len());
        for &start in rest {
            let mut path = vec![start];
            let mut cursor = self.parent_index(start);
            while let Some(parent) = cursor {
                if keeper_set.contains(&parent) {
                    path.push(parent);
                    break;
                }
                if self.child_indices(parent).len() > 1 {
                    *visits.entry(parent).or_insert(0) += 1;
                    path.push(parent);
                    if !passed.insert(parent) {
                        break;
                    }
                }
                cursor = self.parent_index(parent);
            }
            paths.push(path);
        }

        let mut reduced = ReducedTree::with_nodes(ordered.iter().map(|&index| self.id_at(index)));
        for path in &paths {
            let Some((&first, tail)) = path.split_first() else {
                continue;
            };
            let Some((&last, middle)) = tail.split_last() else {
                continue;
            };
            let mut origin = first;
            for &branch in middle {
                if visits.get(&branch).copied().unwrap_or(0) > 1 {
                    reduced.add_edge(self.id_at(origin), self.id_at(branch));
                    origin = branch;
                }
            }
            reduced.add_edge(self.id_at(origin), self.id_at(last));
        }

        debug!(
            kept = reduced.node_count(),
            edges = reduced.edge_count(),
            "tree simplified"
        );
        Ok(reduced)
    }
}
