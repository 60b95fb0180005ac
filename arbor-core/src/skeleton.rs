//! Input rows describing one skeleton and its synapses.

use std::fmt;

use crate::{
    Result,
    tree::{NodeId, NodeRow, Tree},
};

/// Identifier of a synaptic connector, as assigned by the data store.
pub type ConnectorId = u64;

/// Which side of a connector a skeleton node sits on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SynapseRole {
    /// The node is an output site.
    #[cfg_attr(feature = "serde", serde(rename = "presynaptic_to"))]
    Presynaptic,
    /// The node is an input site.
    #[cfg_attr(feature = "serde", serde(rename = "postsynaptic_to"))]
    Postsynaptic,
}

impl SynapseRole {
    /// Relation name used by the annotation store.
    #[must_use]
    pub const fn relation_name(self) -> &'static str {
        match self {
            Self::Presynaptic => "presynaptic_to",
            Self::Postsynaptic => "postsynaptic_to",
        }
    }
}

impl fmt::Display for SynapseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.relation_name())
    }
}

/// One `(node, connector, role)` association.
///
/// A node may appear in several rows, with the same or different roles.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseRow {
    /// Skeleton node carrying the synapse.
    pub node: NodeId,
    /// Connector the node is linked to.
    pub connector: ConnectorId,
    /// Side of the connector.
    pub role: SynapseRole,
}

impl SynapseRow {
    /// Creates a row.
    #[must_use]
    pub const fn new(node: NodeId, connector: ConnectorId, role: SynapseRole) -> Self {
        Self {
            node,
            connector,
            role,
        }
    }

    /// Shorthand for a presynaptic row.
    #[must_use]
    pub const fn presynaptic(node: NodeId, connector: ConnectorId) -> Self {
        Self::new(node, connector, SynapseRole::Presynaptic)
    }

    /// Shorthand for a postsynaptic row.
    #[must_use]
    pub const fn postsynaptic(node: NodeId, connector: ConnectorId) -> Self {
        Self::new(node, connector, SynapseRole::Postsynaptic)
    }
}

/// Everything needed to analyse one skeleton.
///
/// # Examples
///
/// ```
/// use arbor_core::{NodeRow, Skeleton, SynapseRow};
///
/// let skeleton = Skeleton::new(
///     vec![
///         NodeRow::from((1, None, 0.0, 0.0, 0.0)),
///         NodeRow::from((2, Some(1), 1.0, 0.0, 0.0)),
///     ],
///     vec![SynapseRow::presynaptic(2, 900)],
/// );
/// let tree = skeleton.tree()?;
/// assert_eq!(tree.find_root(), 1);
/// # Ok::<(), arbor_core::ArborError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skeleton {
    /// Node rows, in store order.
    pub nodes: Vec<NodeRow>,
    /// Synapse rows restricted to nodes of this skeleton.
    #[cfg_attr(feature = "serde", serde(default))]
    pub synapses: Vec<SynapseRow>,
}

impl Skeleton {
    /// Bundles node and synapse rows.
    #[must_use]
    pub fn new(nodes: Vec<NodeRow>, synapses: Vec<SynapseRow>) -> Self {
        Self { nodes, synapses }
    }

    /// Builds and validates the tree described by the node rows.
    ///
    /// # Errors
    /// Propagates the [`crate::TreeError`] raised by [`Tree::from_rows`].
    pub fn tree(&self) -> Result<Tree> {
        Tree::from_rows(self.nodes.iter().copied())
    }
}
