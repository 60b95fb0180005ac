//! Rooted skeleton trees and the topology toolkit that operates on them.
//!
//! A [`Tree`] is built once per analysis from the `(node, parent, x, y, z)`
//! rows of one skeleton. Nodes live in an arena indexed by their position in
//! the input, so iteration order is the input order and every tie-break in
//! this crate is reproducible. Each node stores its parent and its children;
//! both views are kept in step by the mutating operations.
//!
//! The toolkit is split by concern:
//!
//! - `ancestry`: hop counts from the root and lowest common ancestors.
//! - `reroot`: in-place reversal of the parent chain.
//! - `simplify`: reduction to a set of keeper nodes and their branch points.
//! - `partition`: leaf-to-branch sequences and minimal spanning subtrees.
//!
//! Operations that restructure a tree in place (`reroot`, `simplify`) take
//! `&mut self`; clone the tree first when the original shape is still needed.

mod ancestry;
mod partition;
mod reroot;
mod simplify;

use std::collections::{HashMap, VecDeque};

use crate::{
    Result,
    error::{ArgumentError, TreeError},
    geometry::Point3,
};

pub use self::{ancestry::RootDistances, partition::Partition, simplify::ReducedTree};

/// Identifier of a skeleton node, as assigned by the data store.
pub type NodeId = u64;

/// One `(node, parent, location)` row of a skeleton.
///
/// # Examples
///
/// ```
/// use arbor_core::{NodeRow, Point3};
///
/// let row = NodeRow::new(7, Some(3), Point3::new(1.0, 2.0, 3.0));
/// assert_eq!(row.parent, Some(3));
/// assert_eq!(NodeRow::from((7, Some(3), 1.0, 2.0, 3.0)), row);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRow {
    /// Node identifier.
    pub id: NodeId,
    /// Parent identifier, absent only for the root.
    pub parent: Option<NodeId>,
    /// Node location.
    pub location: Point3,
}

impl NodeRow {
    /// Creates a row.
    #[must_use]
    pub const fn new(id: NodeId, parent: Option<NodeId>, location: Point3) -> Self {
        Self {
            id,
            parent,
            location,
        }
    }
}

impl From<(NodeId, Option<NodeId>, f64, f64, f64)> for NodeRow {
    fn from((id, parent, x, y, z): (NodeId, Option<NodeId>, f64, f64, f64)) -> Self {
        Self::new(id, parent, Point3::new(x, y, z))
    }
}

/// A validated rooted tree of skeleton nodes.
///
/// # Examples
///
/// ```
/// use arbor_core::{NodeRow, Tree};
///
/// let tree = Tree::from_rows([
///     NodeRow::from((1, None, 0.0, 0.0, 0.0)),
///     NodeRow::from((2, Some(1), 3.0, 4.0, 0.0)),
///     NodeRow::from((3, Some(1), 0.0, 0.0, 2.0)),
/// ])?;
/// assert_eq!(tree.find_root(), 1);
/// assert_eq!(tree.children(1)?, vec![2, 3]);
/// assert_eq!(tree.cable_length(), 7.0);
/// # Ok::<(), arbor_core::ArborError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Tree {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    parents: Vec<Option<usize>>,
    // Ascending dense index in every list.
    children: Vec<Vec<usize>>,
    locations: Vec<Point3>,
}

impl Tree {
    /// Builds a tree from node rows, validating that they form exactly one
    /// rooted, connected, acyclic structure.
    ///
    /// # Errors
    /// Returns [`TreeError::Empty`] for no rows, [`TreeError::DuplicateNode`],
    /// [`TreeError::NonFiniteLocation`], [`TreeError::UnknownParent`],
    /// [`TreeError::NoRoot`], [`TreeError::MultipleRoots`] or
    /// [`TreeError::Cycle`] when the rows are malformed.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = NodeRow>,
    {
        let rows: Vec<NodeRow> = rows.into_iter().collect();
        if rows.is_empty() {
            return Err(TreeError::Empty.into());
        }

        let mut index = HashMap::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            if !row.location.is_finite() {
                return Err(TreeError::NonFiniteLocation { node: row.id }.into());
            }
            if index.insert(row.id, position).is_some() {
                return Err(TreeError::DuplicateNode { node: row.id }.into());
            }
        }

        let mut parents = Vec::with_capacity(rows.len());
        let mut children = vec![Vec::new(); rows.len()];
        let mut root: Option<NodeId> = None;
        for (position, row) in rows.iter().enumerate() {
            let Some(parent) = row.parent else {
                if let Some(first) = root {
                    return Err(TreeError::MultipleRoots {
                        first,
                        second: row.id,
                    }
                    .into());
                }
                root = Some(row.id);
                parents.push(None);
                continue;
            };
            let parent_index = index.get(&parent).copied().ok_or(TreeError::UnknownParent {
                node: row.id,
                parent,
            })?;
            parents.push(Some(parent_index));
            children[parent_index].push(position);
        }

        let tree = Self {
            ids: rows.iter().map(|row| row.id).collect(),
            index,
            parents,
            children,
            locations: rows.iter().map(|row| row.location).collect(),
        };
        if root.is_none() {
            return Err(TreeError::NoRoot.into());
        }
        tree.ensure_connected()?;
        Ok(tree)
    }

    fn ensure_connected(&self) -> Result<()> {
        let mut reached = vec![false; self.len()];
        let mut queue = VecDeque::from([self.root_index()]);
        while let Some(node) = queue.pop_front() {
            reached[node] = true;
            queue.extend(self.children[node].iter().copied());
        }
        match reached.iter().position(|seen| !seen) {
            Some(stranded) => Err(TreeError::Cycle {
                node: self.ids[stranded],
            }
            .into()),
            None => Ok(()),
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always `false`: construction rejects empty input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `true` when `node` is part of the tree.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    /// Iterates over node identifiers in input order.
    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Returns the first node, in iteration order, that has no parent.
    ///
    /// A validated tree has exactly one such node, so the answer is unique.
    #[must_use]
    pub fn find_root(&self) -> NodeId {
        self.ids[self.root_index()]
    }

    /// Returns the parent of `node`, or `None` for the root.
    ///
    /// # Errors
    /// Returns [`ArgumentError::UnknownNode`] when `node` is not in the tree.
    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        let index = self.index_of(node)?;
        Ok(self.parents[index].map(|parent| self.ids[parent]))
    }

    /// Returns the children of `node` in insertion order.
    ///
    /// # Errors
    /// Returns [`ArgumentError::UnknownNode`] when `node` is not in the tree.
    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let index = self.index_of(node)?;
        Ok(self.children[index]
            .iter()
            .map(|&child| self.ids[child])
            .collect())
    }

    /// Returns the location of `node`.
    ///
    /// # Errors
    /// Returns [`ArgumentError::UnknownNode`] when `node` is not in the tree.
    pub fn location(&self, node: NodeId) -> Result<Point3> {
        let index = self.index_of(node)?;
        Ok(self.locations[index])
    }

    /// Nodes without children, in iteration order.
    #[must_use]
    pub fn leaves(&self) -> Vec<NodeId> {
        self.indices_where(|children| children.is_empty())
    }

    /// Nodes with more than one child, in iteration order.
    #[must_use]
    pub fn branch_points(&self) -> Vec<NodeId> {
        self.indices_where(|children| children.len() > 1)
    }

    fn indices_where(&self, predicate: impl Fn(&[usize]) -> bool) -> Vec<NodeId> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, children)| predicate(children))
            .map(|(index, _)| self.ids[index])
            .collect()
    }

    /// Total cable length: the sum over every parent–child edge of the
    /// Euclidean distance between the two node locations.
    ///
    /// The value does not depend on which node is the root.
    #[must_use]
    pub fn cable_length(&self) -> f64 {
        self.parents
            .iter()
            .enumerate()
            .filter_map(|(child, parent)| {
                parent.map(|parent| self.locations[child].distance(&self.locations[parent]))
            })
            .sum()
    }

    /// Exports the current structure as rows, in iteration order.
    #[must_use]
    pub fn to_rows(&self) -> Vec<NodeRow> {
        (0..self.len())
            .map(|index| {
                NodeRow::new(
                    self.ids[index],
                    self.parents[index].map(|parent| self.ids[parent]),
                    self.locations[index],
                )
            })
            .collect()
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

    pub(crate) fn parent_index(&self, index: usize) -> Option<usize> {
        self.parents[index]
    }

    pub(crate) fn child_indices(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    pub(crate) fn location_at(&self, index: usize) -> Point3 {
        self.locations[index]
    }

    pub(crate) fn root_index(&self) -> usize {
        // Validated trees always carry a root; index 0 is never reached.
        self.parents
            .iter()
            .position(Option::is_none)
            .unwrap_or_default()
    }
}


#[cfg(test)]
mod property;
