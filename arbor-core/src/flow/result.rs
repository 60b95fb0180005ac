//! Output types for synapse clustering.

use crate::{
    skeleton::{ConnectorId, SynapseRole, SynapseRow},
    tree::NodeId,
};

/// One synapse row assigned to a group.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseMember {
    /// Skeleton node carrying the synapse.
    pub node: NodeId,
    /// Connector the node is linked to.
    pub connector: ConnectorId,
    /// Side of the connector.
    pub role: SynapseRole,
}

impl From<SynapseRow> for SynapseMember {
    fn from(row: SynapseRow) -> Self {
        Self {
            node: row.node,
            connector: row.connector,
            role: row.role,
        }
    }
}

/// Synapses whose density hill climb ends at the same local maximum.
///
/// # Examples
/// ```
/// use arbor_core::{SynapseGroup, SynapseMember, SynapseRole};
///
/// let group = SynapseGroup::new(
///     4,
///     vec![SynapseMember { node: 3, connector: 10, role: SynapseRole::Presynaptic }],
/// );
/// assert_eq!(group.representative(), 4);
/// assert_eq!(group.node_ids().collect::<Vec<_>>(), vec![3]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseGroup {
    representative: NodeId,
    members: Vec<SynapseMember>,
}

impl SynapseGroup {
    /// Creates a group around `representative`.
    #[must_use]
    pub fn new(representative: NodeId, members: Vec<SynapseMember>) -> Self {
        Self {
            representative,
            members,
        }
    }

    /// Node at the density maximum shared by every member.
    #[must_use]
    pub fn representative(&self) -> NodeId {
        self.representative
    }

    /// Members in input row order.
    #[must_use]
    pub fn members(&self) -> &[SynapseMember] {
        &self.members
    }

    /// Number of member rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member nodes, one entry per row.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().map(|member| member.node)
    }

    /// Member connectors, one entry per row.
    pub fn connector_ids(&self) -> impl Iterator<Item = ConnectorId> + '_ {
        self.members.iter().map(|member| member.connector)
    }

    /// Member roles, one entry per row.
    pub fn roles(&self) -> impl Iterator<Item = SynapseRole> + '_ {
        self.members.iter().map(|member| member.role)
    }

    pub(crate) fn push(&mut self, member: SynapseMember) {
        self.members.push(member);
    }
}

/// Groups found for one bandwidth.
///
/// A group's index is its position in [`BandwidthGroups::groups`]; groups are
/// ordered by the first input row that belongs to them. Group identity is not
/// comparable across bandwidths.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BandwidthGroups {
    bandwidth: f64,
    groups: Vec<SynapseGroup>,
}

impl BandwidthGroups {
    pub(crate) fn new(bandwidth: f64, groups: Vec<SynapseGroup>) -> Self {
        Self { bandwidth, groups }
    }

    /// Smoothing bandwidth the groups were computed with.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Groups in order of first appearance.
    #[must_use]
    pub fn groups(&self) -> &[SynapseGroup] {
        &self.groups
    }

    /// Index of the group containing `node`, if any row of `node` was
    /// clustered.
    #[must_use]
    pub fn group_of(&self, node: NodeId) -> Option<usize> {
        self.groups
            .iter()
            .position(|group| group.node_ids().any(|member| member == node))
    }
}

/// Clustering output: one [`BandwidthGroups`] per requested bandwidth, in
/// request order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseClustering {
    per_bandwidth: Vec<BandwidthGroups>,
}

impl SynapseClustering {
    pub(crate) fn new(per_bandwidth: Vec<BandwidthGroups>) -> Self {
        Self { per_bandwidth }
    }

    /// Results in bandwidth request order.
    #[must_use]
    pub fn per_bandwidth(&self) -> &[BandwidthGroups] {
        &self.per_bandwidth
    }

    /// Results for the `index`-th requested bandwidth.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BandwidthGroups> {
        self.per_bandwidth.get(index)
    }

    /// Number of bandwidths that were evaluated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.per_bandwidth.len()
    }

    /// Returns `true` when no bandwidth was evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_bandwidth.is_empty()
    }

    /// Iterates over per-bandwidth results.
    pub fn iter(&self) -> std::slice::Iter<'_, BandwidthGroups> {
        self.per_bandwidth.iter()
    }
}

impl<'a> IntoIterator for &'a SynapseClustering {
    type Item = &'a BandwidthGroups;
    type IntoIter = std::slice::Iter<'a, BandwidthGroups>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
