//! Seeded synthetic neurons.
//!
//! A neuron grows one node at a time. Each new node usually extends the most
//! recent one, and with probability `branch_probability` sprouts from a
//! random earlier node instead, which yields long unbranched runs joined at
//! branch points, like a traced arbor. Synapses land on random nodes.

use arbor_core::{NodeId, NodeRow, Point3, Skeleton, SynapseRow};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors raised for unusable generator settings.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum SyntheticError {
    /// A neuron needs at least one node.
    #[error("node_count must be at least 1")]
    ZeroNodes,
    /// A probability fell outside `[0, 1]`.
    #[error("{parameter} must lie in [0, 1]")]
    InvalidProbability {
        /// Name of the offending setting.
        parameter: &'static str,
    },
    /// The segment length was zero, negative or non-finite.
    #[error("segment_length must be finite and positive")]
    InvalidSegmentLength,
}

/// Settings for [`generate_neuron`].
#[derive(Clone, Debug)]
pub struct SyntheticNeuronConfig {
    /// Number of skeleton nodes.
    pub node_count: usize,
    /// Chance that a node branches off a random earlier node.
    pub branch_probability: f64,
    /// Number of synapse rows, each on its own connector.
    pub synapse_count: usize,
    /// Chance that a synapse row is presynaptic.
    pub presynaptic_fraction: f64,
    /// Distance between a node and its parent, in nanometres.
    pub segment_length: f64,
    /// Seed of the `SmallRng` stream.
    pub seed: u64,
}

impl Default for SyntheticNeuronConfig {
    fn default() -> Self {
        Self {
            node_count: 1_000,
            branch_probability: 0.05,
            synapse_count: 100,
            presynaptic_fraction: 0.3,
            segment_length: 250.0,
            seed: 42,
        }
    }
}

/// Generates a neuron with node ids `1..=node_count`, rooted at `1`.
///
/// # Errors
/// Returns [`SyntheticError`] when a setting is out of range.
///
/// # Examples
/// ```
/// use arbor_benches::synthetic::{SyntheticNeuronConfig, generate_neuron};
///
/// let skeleton = generate_neuron(&SyntheticNeuronConfig {
///     node_count: 50,
///     synapse_count: 5,
///     ..SyntheticNeuronConfig::default()
/// })?;
/// assert_eq!(skeleton.nodes.len(), 50);
/// assert!(skeleton.tree().is_ok());
/// # Ok::<(), arbor_benches::synthetic::SyntheticError>(())
/// ```
pub fn generate_neuron(config: &SyntheticNeuronConfig) -> Result<Skeleton, SyntheticError> {
    validate(config)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut nodes: Vec<NodeRow> = Vec::with_capacity(config.node_count);
    nodes.push(NodeRow::new(1, None, Point3::new(0.0, 0.0, 0.0)));
    for id in 2..=config.node_count as NodeId {
        let parent = if rng.gen_bool(config.branch_probability) {
            rng.gen_range(1..id)
        } else {
            id - 1
        };
        let origin = parent_location(&nodes, parent);
        let location = step(&mut rng, origin, config.segment_length);
        nodes.push(NodeRow::new(id, Some(parent), location));
    }

    let node_count = config.node_count as NodeId;
    let synapses = (0..config.synapse_count as u64)
        .map(|connector| {
            let node = rng.gen_range(1..=node_count);
            if rng.gen_bool(config.presynaptic_fraction) {
                SynapseRow::presynaptic(node, connector)
            } else {
                SynapseRow::postsynaptic(node, connector)
            }
        })
        .collect();
    Ok(Skeleton::new(nodes, synapses))
}

fn validate(config: &SyntheticNeuronConfig) -> Result<(), SyntheticError> {
    if config.node_count == 0 {
        return Err(SyntheticError::ZeroNodes);
    }
    for (parameter, value) in [
        ("branch_probability", config.branch_probability),
        ("presynaptic_fraction", config.presynaptic_fraction),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(SyntheticError::InvalidProbability { parameter });
        }
    }
    if !config.segment_length.is_finite() || config.segment_length <= 0.0 {
        return Err(SyntheticError::InvalidSegmentLength);
    }
    Ok(())
}

fn parent_location(nodes: &[NodeRow], parent: NodeId) -> Point3 {
    // Ids are 1-based and dense, so `parent - 1` is the parent's row.
    usize::try_from(parent - 1)
        .ok()
        .and_then(|index| nodes.get(index))
        .map_or(Point3::new(0.0, 0.0, 0.0), |row| row.location)
}

#[expect(
    clippy::float_arithmetic,
    reason = "Node placement offsets a point along a random direction."
)]
fn step(rng: &mut SmallRng, origin: Point3, length: f64) -> Point3 {
    let theta = rng.gen_range(0.0..std::f64::consts::TAU);
    let cos_phi: f64 = rng.gen_range(-1.0..=1.0);
    let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
    Point3::new(
        origin.x + length * sin_phi * theta.cos(),
        origin.y + length * sin_phi * theta.sin(),
        origin.z + length * cos_phi,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config(node_count: usize) -> SyntheticNeuronConfig {
        SyntheticNeuronConfig {
            node_count,
            ..SyntheticNeuronConfig::default()
        }
    }

    #[rstest]
    #[case::single(1)]
    #[case::small(20)]
    #[case::large(2_000)]
    fn generated_rows_form_a_tree(#[case] node_count: usize) {
        let skeleton = generate_neuron(&config(node_count)).expect("config is valid");
        let tree = skeleton.tree().expect("rows form a tree");
        assert_eq!(tree.len(), node_count);
        assert_eq!(tree.find_root(), 1);
        let expected = 250.0 * (node_count - 1) as f64;
        assert!((tree.cable_length() - expected).abs() < 1e-6 * expected.max(1.0));
    }

    #[test]
    fn same_seed_same_neuron() {
        let first = generate_neuron(&config(300)).expect("valid");
        let second = generate_neuron(&config(300)).expect("valid");
        assert_eq!(first, second);
        let other = generate_neuron(&SyntheticNeuronConfig {
            seed: 7,
            ..config(300)
        })
        .expect("valid");
        assert_ne!(first, other);
    }

    #[test]
    fn synapses_reference_generated_nodes() {
        let skeleton = generate_neuron(&config(100)).expect("valid");
        assert_eq!(skeleton.synapses.len(), 100);
        assert!(
            skeleton
                .synapses
                .iter()
                .all(|row| (1..=100).contains(&row.node))
        );
    }

    #[rstest]
    #[case::no_nodes(SyntheticNeuronConfig { node_count: 0, ..SyntheticNeuronConfig::default() }, SyntheticError::ZeroNodes)]
    #[case::branching(
        SyntheticNeuronConfig { branch_probability: 1.5, ..SyntheticNeuronConfig::default() },
        SyntheticError::InvalidProbability { parameter: "branch_probability" },
    )]
    #[case::fraction(
        SyntheticNeuronConfig { presynaptic_fraction: -0.1, ..SyntheticNeuronConfig::default() },
        SyntheticError::InvalidProbability { parameter: "presynaptic_fraction" },
    )]
    #[case::segment(
        SyntheticNeuronConfig { segment_length: 0.0, ..SyntheticNeuronConfig::default() },
        SyntheticError::InvalidSegmentLength,
    )]
    fn rejects_bad_settings(#[case] config: SyntheticNeuronConfig, #[case] expected: SyntheticError) {
        assert_eq!(generate_neuron(&config), Err(expected));
    }
}
