//! Command-line interface for analysing one skeleton document.
//!
//! `cluster` groups the synapses of a skeleton for one or more bandwidths and
//! scores their segregation; `stats` reports the shape of its tree.

mod commands;
mod input;
mod render;

pub use commands::{
    Cli, CliError, ClusterCommand, Command, StatsCommand, StrategyArg, run_cli,
};
pub use input::SkeletonDocument;
pub use render::{BandwidthSummary, ClusterSummary, ExecutionSummary, StatsSummary, render_summary};

#[cfg(test)]
mod test_helpers;
