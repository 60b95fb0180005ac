//! Argument parsing and command execution for the arbor CLI.

use std::io;
use std::path::PathBuf;

use arbor_core::{
    ArborError, ExecutionStrategy, SegregationWeights, SynapseFlowBuilder, segregation_index,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::input::{SkeletonDocument, load_document};
use super::render::{BandwidthSummary, ClusterSummary, ExecutionSummary, StatsSummary};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "arbor", about = "Analyse neuron skeleton topology and synapse clustering.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster synapses by geodesic density and score their segregation.
    Cluster(ClusterCommand),
    /// Report the root, size and cable length of a skeleton.
    Stats(StatsCommand),
}

/// Options accepted by the `cluster` command.
#[derive(Debug, Args, Clone)]
pub struct ClusterCommand {
    /// Path to a skeleton JSON document.
    pub path: PathBuf,

    /// Smoothing bandwidth in the units of the node coordinates; repeatable.
    #[arg(long = "bandwidth", short = 'b', required = true, num_args = 1..)]
    pub bandwidths: Vec<f64>,

    /// How bandwidths are scheduled.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,

    /// Weight each output by the number of partners of its connector.
    #[arg(long)]
    pub weighted: bool,
}

/// Options accepted by the `stats` command.
#[derive(Debug, Args, Clone)]
pub struct StatsCommand {
    /// Path to a skeleton JSON document.
    pub path: PathBuf,
}

/// Execution strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Parallel when the engine was built with it.
    Auto,
    /// One bandwidth at a time.
    Sequential,
    /// One task per bandwidth on the thread pool.
    Parallel,
}

impl From<StrategyArg> for ExecutionStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::Sequential => Self::Sequential,
            StrategyArg::Parallel => Self::Parallel,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input document could not be read.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input document is not a valid skeleton document.
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        /// Path of the malformed document.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The engine rejected the input or configuration.
    #[error(transparent)]
    Core(#[from] ArborError),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the document or running the engine
/// fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use arbor_cli::cli::{Cli, Command, ExecutionSummary, StatsCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     r#"{"nodes": [
///         {"id": 1, "parent": null, "location": {"x": 0.0, "y": 0.0, "z": 0.0}},
///         {"id": 2, "parent": 1, "location": {"x": 3.0, "y": 4.0, "z": 0.0}}
///     ]}"#,
/// )?;
/// let cli = Cli {
///     command: Command::Stats(StatsCommand {
///         path: file.path().to_path_buf(),
///     }),
/// };
/// let ExecutionSummary::Stats(stats) = run_cli(cli)? else {
///     panic!("stats command yields stats");
/// };
/// assert_eq!(stats.root, 1);
/// assert_eq!(stats.cable_length, 5.0);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Cluster(command) => {
            span.record("command", field::display("cluster"));
            run_cluster(command).map(ExecutionSummary::Cluster)
        }
        Command::Stats(command) => {
            span.record("command", field::display("stats"));
            run_stats(&command).map(ExecutionSummary::Stats)
        }
    }
}

#[instrument(
    name = "cli.cluster",
    err,
    skip(command),
    fields(bandwidths = command.bandwidths.len(), weighted = command.weighted),
)]
pub(super) fn run_cluster(command: ClusterCommand) -> Result<ClusterSummary, CliError> {
    let flow = SynapseFlowBuilder::new()
        .with_bandwidths(command.bandwidths)
        .with_execution_strategy(command.strategy.into())
        .build()?;
    let document = load_document(&command.path)?;
    let clustering = flow.run_skeleton(&document.skeleton)?;

    let counts = command.weighted.then(|| document.target_counts());
    let weights = counts
        .as_ref()
        .map_or(SegregationWeights::Uniform, SegregationWeights::TargetCounts);

    let mut bandwidths = Vec::with_capacity(clustering.len());
    for result in &clustering {
        let segregation = match segregation_index(result.groups(), weights) {
            Ok(score) => Some(score),
            Err(ArborError::DegenerateSegregation { .. }) => None,
            Err(err) => return Err(err.into()),
        };
        bandwidths.push(BandwidthSummary {
            result: result.clone(),
            segregation,
        });
    }

    info!(
        synapses = document.skeleton.synapses.len(),
        bandwidths = bandwidths.len(),
        "cluster command completed"
    );
    Ok(ClusterSummary {
        synapses: document.skeleton.synapses.len(),
        bandwidths,
    })
}

#[instrument(name = "cli.stats", err, skip(command))]
pub(super) fn run_stats(command: &StatsCommand) -> Result<StatsSummary, CliError> {
    let SkeletonDocument { skeleton, .. } = load_document(&command.path)?;
    let tree = skeleton.tree()?;
    let summary = StatsSummary {
        root: tree.find_root(),
        nodes: tree.len(),
        leaves: tree.leaves().len(),
        branch_points: tree.branch_points().len(),
        synapses: skeleton.synapses.len(),
        cable_length: tree.cable_length(),
    };
    info!(nodes = summary.nodes, "stats command completed");
    Ok(summary)
}
