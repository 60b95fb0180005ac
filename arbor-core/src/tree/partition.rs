//! Leaf-to-branch partitioning and minimal spanning subtrees.

use std::{collections::HashSet, iter::FusedIterator};

use tracing::{debug, instrument};

use crate::{Result, error::ArgumentError};

use super::{NodeId, NodeRow, Tree};

/// Lazily yields the linear chains of a tree, deepest leaves first.
///
/// Each chain starts at a leaf and climbs parent links until it reaches the
/// root or a node that an earlier chain already passed, which is included as
/// the chain's last element. Returned by [`Tree::partition`].
#[derive(Clone, Debug)]
pub struct Partition<'a> {
    tree: &'a Tree,
    leaves: std::vec::IntoIter<usize>,
    seen: Vec<bool>,
}

impl<'a> Partition<'a> {
    fn new(tree: &'a Tree) -> Self {
        let depths = tree.hop_counts(tree.root_index());
        let mut leaves: Vec<usize> = (0..tree.len())
            .filter(|&index| tree.child_indices(index).is_empty())
            .collect();
        // Stable, so leaves at the same depth keep iteration order.
        leaves.sort_by(|&left, &right| depths[right].cmp(&depths[left]));
        Self {
            tree,
            leaves: leaves.into_iter(),
            seen: vec![false; tree.len()],
        }
    }

    fn next_indices(&mut self) -> Option<Vec<usize>> {
        for leaf in self.leaves.by_ref() {
            let mut chain = vec![leaf];
            let mut cursor = self.tree.parent_index(leaf);
            while let Some(parent) = cursor {
                chain.push(parent);
                if self.seen[parent] {
                    break;
                }
                self.seen[parent] = true;
                cursor = self.tree.parent_index(parent);
            }
            if chain.len() > 1 {
                return Some(chain);
            }
        }
        None
    }
}

impl Iterator for Partition<'_> {
    type Item = Vec<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        let chain = self.next_indices()?;
        Some(chain.into_iter().map(|index| self.tree.id_at(index)).collect())
    }
}

impl FusedIterator for Partition<'_> {}

impl Tree {
    /// Splits the tree into leaf-to-branch chains, emitting chains that start
    /// at leaves farther from the root first.
    ///
    /// Consuming the chains in order guarantees that a branch point appears as
    /// a chain terminal only after the chain continuing above it was emitted;
    /// consuming them in reverse visits every subtree of a branch point before
    /// the branch point itself. A single-node tree yields no chains.
    ///
    /// # Errors
    /// Returns [`ArgumentError::UnknownNode`] when `root` is not in the tree
    /// and [`ArgumentError::NotRoot`] when it is not the tree's root.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::{NodeRow, Tree};
    ///
    /// let tree = Tree::from_rows([
    ///     NodeRow::from((1, None, 0.0, 0.0, 0.0)),
    ///     NodeRow::from((2, Some(1), 0.0, 1.0, 0.0)),
    ///     NodeRow::from((3, Some(2), 0.0, 2.0, 0.0)),
    ///     NodeRow::from((4, Some(1), 1.0, 0.0, 0.0)),
    /// ])?;
    /// let chains: Vec<Vec<u64>> = tree.partition(None)?.collect();
    /// assert_eq!(chains, vec![vec![3, 2, 1], vec![4, 1]]);
    /// # Ok::<(), arbor_core::ArborError>(())
    /// ```
    pub fn partition(&self, root: Option<NodeId>) -> Result<Partition<'_>> {
        if let Some(node) = root {
            if self.index_of(node)? != self.root_index() {
                return Err(ArgumentError::NotRoot { node }.into());
            }
        }
        Ok(Partition::new(self))
    }

    /// Extracts the smallest subtree connecting every node in `preserve`.
    ///
    /// The input tree is not modified. The result is rooted at the lowest
    /// common ancestor of `preserve` in this tree and keeps node locations, so
    /// its [`Tree::cable_length`] is the cable needed to join the set.
    ///
    /// # Errors
    /// Returns [`ArgumentError::EmptyNodeSet`] for an empty `preserve` and
    /// [`ArgumentError::UnknownNode`] for nodes outside the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::{NodeRow, Tree};
    ///
    /// let tree = Tree::from_rows([
    ///     NodeRow::from((1, None, 0.0, 0.0, 0.0)),
    ///     NodeRow::from((2, Some(1), 0.0, 1.0, 0.0)),
    ///     NodeRow::from((3, Some(2), -1.0, 2.0, 0.0)),
    ///     NodeRow::from((4, Some(2), 1.0, 2.0, 0.0)),
    ///     NodeRow::from((5, Some(1), 0.0, -1.0, 0.0)),
    /// ])?;
    /// let spanning = tree.spanning_tree(&[3, 4])?;
    /// assert_eq!(spanning.find_root(), 2);
    /// assert_eq!(spanning.len(), 3);
    /// assert!(!spanning.contains(1));
    /// # Ok::<(), arbor_core::ArborError>(())
    /// ```
    #[instrument(
        name = "tree.spanning_tree",
        err,
        skip(self, preserve),
        fields(nodes = self.len(), preserve = preserve.len())
    )]
    pub fn spanning_tree(&self, preserve: &[NodeId]) -> Result<Self> {
        let mut wanted = Vec::with_capacity(preserve.len());
        let mut wanted_set = HashSet::with_capacity(preserve.len());
        for &node in preserve {
            let index = self.index_of(node)?;
            if wanted_set.insert(index) {
                wanted.push(index);
            }
        }
        let Some(&anchor) = wanted.first() else {
            return Err(ArgumentError::EmptyNodeSet {
                operation: "spanning_tree",
            }
            .into());
        };
        if wanted.len() == 1 {
            return Self::from_rows([NodeRow::new(
                self.id_at(anchor),
                None,
                self.location_at(anchor),
            )]);
        }

        let mut working = self.clone();
        working.reroot_at(anchor);

        let mut marked = vec![false; working.len()];
        for &index in &wanted {
            marked[index] = true;
        }
        let mut parent_of: Vec<Option<usize>> = vec![None; working.len()];
        let chains: Vec<Vec<usize>> = {
            let mut partition = Partition::new(&working);
            std::iter::from_fn(|| partition.next_indices()).collect()
        };
        for chain in chains.iter().rev() {
            let Some(start) = chain.iter().position(|&index| marked[index]) else {
                continue;
            };
            for pair in chain[start..].windows(2) {
                let &[child, parent] = pair else {
                    continue;
                };
                marked[parent] = true;
                parent_of[child] = Some(parent);
            }
        }

        let rows = (0..working.len()).filter(|&index| marked[index]).map(|index| {
            NodeRow::new(
                working.id_at(index),
                parent_of[index].map(|parent| working.id_at(parent)),
                working.location_at(index),
            )
        });
        let mut spanning = Self::from_rows(rows)?;

        let depths = self.hop_counts(self.root_index());
        let mut lowest = (anchor, depths[anchor]);
        for &index in &wanted[1..] {
            lowest = self.pairwise_ancestor(lowest, (index, depths[index]))?;
        }
        spanning.reroot(self.id_at(lowest.0))?;

        debug!(kept = spanning.len(), "spanning tree extracted");
        Ok(spanning)
    }
}
