//! Optional `metrics` emission for the clustering engine.

use std::time::Duration;

#[cfg(feature = "metrics")]
pub(super) fn record_shortest_path_passes(passes: usize) {
    metrics::counter!("synapse_flow_shortest_path_passes").increment(passes as u64);
}

#[cfg(not(feature = "metrics"))]
pub(super) fn record_shortest_path_passes(_passes: usize) {}

#[cfg(feature = "metrics")]
pub(super) fn record_hill_climb_steps(steps: usize) {
    metrics::counter!("synapse_flow_hill_climb_steps").increment(steps as u64);
}

#[cfg(not(feature = "metrics"))]
pub(super) fn record_hill_climb_steps(_steps: usize) {}

#[cfg(feature = "metrics")]
pub(super) fn record_bandwidth_latency(elapsed: Duration) {
    metrics::histogram!("synapse_flow_bandwidth_latency_seconds").record(elapsed.as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
pub(super) fn record_bandwidth_latency(_elapsed: Duration) {}
