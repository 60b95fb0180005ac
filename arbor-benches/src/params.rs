//! Benchmark parameter types, rendered as Criterion benchmark ids.

use std::fmt;

/// Parameters for a tree topology benchmark run.
#[derive(Clone, Debug)]
pub struct TopologyBenchParams {
    /// Number of nodes in the generated neuron.
    pub node_count: usize,
}

impl fmt::Display for TopologyBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.node_count)
    }
}

/// Parameters for a synapse-flow clustering benchmark run.
#[derive(Clone, Debug)]
pub struct FlowBenchParams {
    /// Number of nodes in the generated neuron.
    pub node_count: usize,
    /// Number of synapse rows attached to it.
    pub synapse_count: usize,
    /// Number of bandwidths evaluated per run.
    pub bandwidth_count: usize,
}

impl fmt::Display for FlowBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},s={},h={}",
            self.node_count, self.synapse_count, self.bandwidth_count
        )
    }
}
