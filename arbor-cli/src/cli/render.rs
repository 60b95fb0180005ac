//! Plain-text rendering of command results.

use std::io::{self, Write};

use arbor_core::{BandwidthGroups, NodeId};

/// Outcome of one CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Result of `cluster`.
    Cluster(ClusterSummary),
    /// Result of `stats`.
    Stats(StatsSummary),
}

/// Groups and segregation for every requested bandwidth.
#[derive(Debug, Clone)]
pub struct ClusterSummary {
    /// Number of synapse rows in the input.
    pub synapses: usize,
    /// One entry per bandwidth, in request order.
    pub bandwidths: Vec<BandwidthSummary>,
}

/// Clustering result for one bandwidth.
#[derive(Debug, Clone)]
pub struct BandwidthSummary {
    /// Groups found at this bandwidth.
    pub result: BandwidthGroups,
    /// Segregation index, or `None` when the arbor carries a single role.
    pub segregation: Option<f64>,
}

/// Shape of a skeleton's tree.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    /// Root node.
    pub root: NodeId,
    /// Number of nodes.
    pub nodes: usize,
    /// Nodes without children.
    pub leaves: usize,
    /// Nodes with more than one child.
    pub branch_points: usize,
    /// Number of synapse rows.
    pub synapses: usize,
    /// Summed length of every edge.
    pub cable_length: f64,
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// Cluster output lists one header per bandwidth followed by one line per
/// group: its index, representative node and `node/connector/relation`
/// members.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use arbor_cli::cli::{ExecutionSummary, StatsSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary::Stats(StatsSummary {
///     root: 1,
///     nodes: 3,
///     leaves: 2,
///     branch_points: 1,
///     synapses: 0,
///     cable_length: 2.5,
/// });
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.contains("cable length: 2.500"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Cluster(cluster) => render_cluster(cluster, &mut writer),
        ExecutionSummary::Stats(stats) => render_stats(stats, &mut writer),
    }
}

fn render_cluster(summary: &ClusterSummary, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "synapses: {}", summary.synapses)?;
    for entry in &summary.bandwidths {
        let result = &entry.result;
        match entry.segregation {
            Some(score) => writeln!(
                writer,
                "bandwidth {}: {} groups, segregation {score:.4}",
                result.bandwidth(),
                result.groups().len()
            )?,
            None => writeln!(
                writer,
                "bandwidth {}: {} groups, segregation undefined",
                result.bandwidth(),
                result.groups().len()
            )?,
        }
        for (index, group) in result.groups().iter().enumerate() {
            write!(writer, "{index}\t{}", group.representative())?;
            for member in group.members() {
                write!(
                    writer,
                    "\t{}/{}/{}",
                    member.node, member.connector, member.role
                )?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn render_stats(summary: &StatsSummary, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "root: {}", summary.root)?;
    writeln!(writer, "nodes: {}", summary.nodes)?;
    writeln!(writer, "leaves: {}", summary.leaves)?;
    writeln!(writer, "branch points: {}", summary.branch_points)?;
    writeln!(writer, "synapses: {}", summary.synapses)?;
    writeln!(writer, "cable length: {:.3}", summary.cable_length)
}
