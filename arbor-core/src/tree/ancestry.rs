//! Hop counts from the root and lowest common ancestor queries.

use std::collections::HashMap;

use crate::{Result, error::ArgumentError};

use super::{NodeId, Tree};

/// Hop counts from the root keyed by node. The root itself counts as `1`.
pub type RootDistances = HashMap<NodeId, usize>;

impl Tree {
    /// Labels every node with its hop count from `root`, counting the root
    /// itself as `1` so its children are `2`.
    ///
    /// When `root` is `None` the tree root is used. Supplying another node
    /// labels only the subtree below it.
    ///
    /// # Errors
    /// Returns [`ArgumentError::UnknownNode`] when `root` is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::{NodeRow, Tree};
    ///
    /// let tree = Tree::from_rows((1..=4).map(|id| {
    ///     NodeRow::from((id, (id > 1).then(|| id - 1), 0.0, 0.0, id as f64))
    /// }))?;
    /// let distances = tree.edge_count_to_root(None)?;
    /// assert_eq!(distances[&1], 1);
    /// assert_eq!(distances[&4], 4);
    /// # Ok::<(), arbor_core::ArborError>(())
    /// ```
    pub fn edge_count_to_root(&self, root: Option<NodeId>) -> Result<RootDistances> {
        let start = match root {
            Some(node) => self.index_of(node)?,
            None => self.root_index(),
        };
        let counts = self.hop_counts(start);
        Ok(counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(index, &count)| (self.id_at(index), count))
            .collect())
    }

    /// Level-order hop counts from `start`; unreached nodes stay `0`.
    pub(crate) fn hop_counts(&self, start: usize) -> Vec<usize> {
        let mut counts = vec![0; self.len()];
        let mut level = vec![start];
        let mut next = Vec::new();
        let mut count = 1;
        while !level.is_empty() {
            for node in level.drain(..) {
                counts[node] = count;
                next.extend_from_slice(self.child_indices(node));
            }
            std::mem::swap(&mut level, &mut next);
            count += 1;
        }
        counts
    }

    /// Returns the lowest common ancestor of `nodes` and its hop count from
    /// the root.
    ///
    /// Two nodes are resolved by lifting the deeper one until both sit at the
    /// same hop count, then walking both parent chains in lock-step until they
    /// meet. Larger sets are reduced pairwise, so every node in `nodes`
    /// constrains the answer. A single node is its own ancestor.
    ///
    /// `distances` may carry hop counts from an earlier
    /// [`Tree::edge_count_to_root`] call; `root` is used only when they are
    /// absent.
    ///
    /// # Errors
    /// Returns [`ArgumentError::EmptyNodeSet`] for an empty `nodes`,
    /// [`ArgumentError::UnknownNode`] for nodes outside the tree and
    /// [`ArgumentError::InconsistentDistances`] when `distances` lacks a node
    /// or contradicts the parent links.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::{NodeRow, Tree};
    ///
    /// let tree = Tree::from_rows((1..=7).map(|id| {
    ///     NodeRow::from((id, (id > 1).then(|| id - 1), 0.0, 0.0, id as f64))
    /// }))?;
    /// assert_eq!(tree.find_common_ancestor(&[3, 6], None, None)?, (3, 3));
    /// # Ok::<(), arbor_core::ArborError>(())
    /// ```
    pub fn find_common_ancestor(
        &self,
        nodes: &[NodeId],
        distances: Option<&RootDistances>,
        root: Option<NodeId>,
    ) -> Result<(NodeId, usize)> {
        if nodes.is_empty() {
            return Err(ArgumentError::EmptyNodeSet {
                operation: "find_common_ancestor",
            }
            .into());
        }
        if let Some(distances) = distances {
            return self.common_ancestor_with(nodes, |_, node| distances.get(&node).copied());
        }
        let start = match root {
            Some(node) => self.index_of(node)?,
            None => self.root_index(),
        };
        let counts = self.hop_counts(start);
        self.common_ancestor_with(nodes, |index, _| counts.get(index).copied())
    }

    /// Answers many ancestor queries against one shared set of root distances.
    ///
    /// # Errors
    /// Fails on the first group that [`Tree::find_common_ancestor`] rejects.
    pub fn find_common_ancestors<G>(
        &self,
        groups: impl IntoIterator<Item = G>,
    ) -> Result<Vec<(NodeId, usize)>>
    where
        G: AsRef<[NodeId]>,
    {
        let distances = self.edge_count_to_root(None)?;
        groups
            .into_iter()
            .map(|group| self.find_common_ancestor(group.as_ref(), Some(&distances), None))
            .collect()
    }

    fn common_ancestor_with(
        &self,
        nodes: &[NodeId],
        depth_of: impl Fn(usize, NodeId) -> Option<usize>,
    ) -> Result<(NodeId, usize)> {
        let mut resolved = Vec::with_capacity(nodes.len());
        for &node in nodes {
            let index = self.index_of(node)?;
            let depth = depth_of(index, node)
                .filter(|&depth| depth > 0)
                .ok_or(ArgumentError::InconsistentDistances { node })?;
            resolved.push((index, depth));
        }
        let Some((&first, rest)) = resolved.split_first() else {
            return Err(ArgumentError::EmptyNodeSet {
                operation: "find_common_ancestor",
            }
            .into());
        };
        let (index, depth) = rest
            .iter()
            .try_fold(first, |acc, &next| self.pairwise_ancestor(acc, next))?;
        Ok((self.id_at(index), depth))
    }

    pub(crate) fn pairwise_ancestor(
        &self,
        (mut left, mut left_depth): (usize, usize),
        (mut right, mut right_depth): (usize, usize),
    ) -> Result<(usize, usize)> {
        while left_depth > right_depth {
            left = self.step_up(left)?;
            left_depth -= 1;
        }
        while right_depth > left_depth {
            right = self.step_up(right)?;
            right_depth -= 1;
        }
        while left != right {
            left = self.step_up(left)?;
            right = self.step_up(right)?;
            left_depth = left_depth.saturating_sub(1);
        }
        Ok((left, left_depth))
    }

    fn step_up(&self, index: usize) -> Result<usize> {
        self.parent_index(index).ok_or_else(|| {
            ArgumentError::InconsistentDistances {
                node: self.id_at(index),
            }
            .into()
        })
    }
}
